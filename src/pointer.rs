/*
 * Pointer Module
 *
 * This module turns the tracked pointer (a normalized 2D coordinate, or
 * nothing) into a 3D world point on the z = 0 plane holding the lattice.
 * When there is no signal the resolver returns a sentinel point far outside
 * every interaction radius, so bodies need no separate "active" flag.
 *
 * The latest signal lives in a PointerSlot: the input stream overwrites it
 * at its own cadence and the render loop reads it once per frame.
 */

use std::sync::{Arc, Mutex, PoisonError};

use nalgebra::{Point3, Vector2};

use crate::camera::Camera;

// Where the pointer goes when there is no signal
pub fn far_away() -> Point3<f32> {
    Point3::new(-999.0, -999.0, 0.0)
}

// z of the plane the pointer is projected onto
pub const WORLD_PLANE_Z: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerSignal {
    #[default]
    Absent,
    // x to the right, y downward, both in 0..=1
    Normalized { x: f32, y: f32 },
}

impl PointerSignal {
    // Non-finite input becomes Absent, out-of-range input is clamped
    pub fn normalized(x: f32, y: f32) -> Self {
        if !x.is_finite() || !y.is_finite() {
            return PointerSignal::Absent;
        }
        PointerSignal::Normalized { x: x.clamp(0.0, 1.0), y: y.clamp(0.0, 1.0) }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, PointerSignal::Normalized { .. })
    }

    // Symmetric device coordinates, origin at the center, y up
    pub fn device_coords(&self) -> Option<Vector2<f32>> {
        match *self {
            PointerSignal::Absent => None,
            PointerSignal::Normalized { x, y } => Some(Vector2::new(x * 2.0 - 1.0, -(y * 2.0 - 1.0))),
        }
    }
}

// Project the pointer through the camera onto the lattice plane
pub fn resolve(signal: PointerSignal, camera: &Camera) -> Point3<f32> {
    signal
        .device_coords()
        .and_then(|ndc| camera.ray_through(ndc))
        .and_then(|ray| ray.intersect_z_plane(WORLD_PLANE_Z))
        .unwrap_or_else(far_away)
}

// Single shared slot holding the most recent signal; last write wins
#[derive(Debug, Clone, Default)]
pub struct PointerSlot {
    latest: Arc<Mutex<PointerSignal>>,
}

impl PointerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, signal: PointerSignal) {
        // A poisoned slot still holds a plain value
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *latest = signal;
    }

    pub fn clear(&self) {
        self.publish(PointerSignal::Absent);
    }

    pub fn latest(&self) -> PointerSignal {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_coords_flip_y() {
        let ndc = PointerSignal::normalized(0.25, 0.25).device_coords().unwrap();
        assert_eq!(ndc, Vector2::new(-0.5, 0.5));
    }

    #[test]
    fn malformed_input_is_absent_or_clamped() {
        assert_eq!(PointerSignal::normalized(f32::NAN, 0.5), PointerSignal::Absent);
        assert_eq!(PointerSignal::normalized(0.5, f32::INFINITY), PointerSignal::Absent);
        assert_eq!(PointerSignal::normalized(-0.2, 1.7), PointerSignal::Normalized { x: 0.0, y: 1.0 });
    }

    #[test]
    fn center_resolves_to_origin() {
        let point = resolve(PointerSignal::normalized(0.5, 0.5), &Camera::new());
        assert!((point - Point3::origin()).norm() < 1e-4);
    }

    #[test]
    fn slot_keeps_only_the_last_write() {
        let slot = PointerSlot::new();
        assert_eq!(slot.latest(), PointerSignal::Absent);

        let producer = slot.clone();
        producer.publish(PointerSignal::normalized(0.1, 0.2));
        producer.publish(PointerSignal::normalized(0.3, 0.4));
        assert_eq!(slot.latest(), PointerSignal::Normalized { x: 0.3, y: 0.4 });

        producer.clear();
        assert!(!slot.latest().is_present());
    }
}
