/*
 * Camera Module
 *
 * This module defines the perspective Camera used both to resolve the pointer
 * into the world and to draw the bodies. It provides coordinate
 * transformations between world space, normalized device coordinates and
 * screen space, and casts rays through device coordinates.
 */

use nalgebra::{Isometry3, Perspective3, Point3, Unit, Vector2, Vector3};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

// Half-line from an origin along a unit direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Unit<Vector3<f32>>,
}

impl Ray {
    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction.into_inner() * t
    }

    // Intersection with the plane z = `plane_z`; None when parallel or behind
    pub fn intersect_z_plane(&self, plane_z: f32) -> Option<Point3<f32>> {
        let denominator = self.direction.z;
        if denominator.abs() < 1e-6 {
            return None;
        }
        let t = (plane_z - self.origin.z) / denominator;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        Some(self.at(t))
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 15.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov_y_degrees: 90.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }

    // Follow a window resize
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn projection(&self) -> Perspective3<f32> {
        Perspective3::new(self.aspect.max(f32::EPSILON), self.fov_y_degrees.to_radians(), self.near, self.far)
    }

    // World -> view space
    pub fn view(&self) -> Isometry3<f32> {
        Isometry3::look_at_rh(&self.position, &self.target, &self.up)
    }

    // Ray from the camera through a device coordinate (x, y in -1..=1, y up)
    pub fn ray_through(&self, ndc: Vector2<f32>) -> Option<Ray> {
        let view_point = self.projection().unproject_point(&Point3::new(ndc.x, ndc.y, 0.5));
        let world_point = self.view().inverse_transform_point(&view_point);
        let direction = Unit::try_new(world_point - self.position, f32::EPSILON)?;
        Some(Ray { origin: self.position, direction })
    }

    // World -> normalized device coordinates; None behind the camera
    pub fn world_to_ndc(&self, point: &Point3<f32>) -> Option<Point3<f32>> {
        let view_point = self.view().transform_point(point);
        if view_point.z >= -self.near {
            return None;
        }
        Some(self.projection().project_point(&view_point))
    }

    // World -> screen space with the origin at the window center, y up
    pub fn world_to_screen(&self, point: &Point3<f32>, width: f32, height: f32) -> Option<Vector2<f32>> {
        let ndc = self.world_to_ndc(point)?;
        Some(Vector2::new(ndc.x * width / 2.0, ndc.y * height / 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_camera() -> Camera {
        Camera { aspect: 1.0, ..Camera::new() }
    }

    #[test]
    fn center_ray_points_at_target() {
        let ray = square_camera().ray_through(Vector2::zeros()).unwrap();
        assert!((ray.direction.into_inner() - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-5);
    }

    #[test]
    fn ray_hits_plane_at_frustum_edge() {
        // 90 degree fov at distance 15 spans -15..15
        let ray = square_camera().ray_through(Vector2::new(1.0, 1.0)).unwrap();
        let hit = ray.intersect_z_plane(0.0).unwrap();
        assert!((hit - Point3::new(15.0, 15.0, 0.0)).norm() < 1e-3);
    }

    #[test]
    fn parallel_and_backward_rays_miss() {
        let sideways = Ray { origin: Point3::new(0.0, 0.0, 5.0), direction: Unit::new_normalize(Vector3::x()) };
        assert!(sideways.intersect_z_plane(0.0).is_none());

        let away = Ray { origin: Point3::new(0.0, 0.0, 5.0), direction: Unit::new_normalize(Vector3::z()) };
        assert!(away.intersect_z_plane(0.0).is_none());
    }

    #[test]
    fn projection_round_trips_through_screen() {
        let camera = square_camera();
        let screen = camera.world_to_screen(&Point3::new(7.5, -3.0, 0.0), 800.0, 800.0).unwrap();
        assert!((screen.x - 200.0).abs() < 1e-2);
        assert!((screen.y + 80.0).abs() < 1e-2);
        assert!(camera.world_to_screen(&Point3::new(0.0, 0.0, 20.0), 800.0, 800.0).is_none());
    }

    #[test]
    fn resize_updates_aspect_and_ignores_zero() {
        let mut camera = Camera::new();
        camera.resize(1000.0, 500.0);
        assert_eq!(camera.aspect, 2.0);
        camera.resize(0.0, 500.0);
        assert_eq!(camera.aspect, 2.0);
    }
}
