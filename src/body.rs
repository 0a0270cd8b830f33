/*
 * Body Module
 *
 * This module defines the Body struct: one floating object on the lattice.
 * A body keeps its fixed home position, its current kinematic state, the
 * randomised constants that give it an individual idle motion, its glow and
 * the shape it renders as.
 */

use std::f32::consts::TAU;

use nalgebra::{Isometry3, Point3, Similarity3, Translation3, UnitQuaternion, Vector3};
use rand::Rng;

use crate::params::GridConfig;
use crate::shape::{Color, Shape};

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    home: Point3<f32>,
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    // Euler angles about x and y; z stays zero
    pub rotation: Vector3<f32>,
    pub float_phase: f32,
    pub float_speed: f32,
    pub float_amplitude: f32,
    pub glow_intensity: f32,
    pub color: Color,
    pub shape: Shape,
}

impl Body {
    // A body at rest on its home position
    pub fn new(home: Point3<f32>, color: Color, shape: Shape) -> Self {
        Self {
            home,
            position: home,
            velocity: Vector3::zeros(),
            rotation: Vector3::zeros(),
            float_phase: 0.0,
            float_speed: 0.0,
            float_amplitude: 0.0,
            glow_intensity: shape.emissive_intensity(),
            color,
            shape,
        }
    }

    // Random float signature drawn from the grid's ranges
    pub fn with_random_motion<R: Rng + ?Sized>(mut self, grid: &GridConfig, rng: &mut R) -> Self {
        self.float_phase = rng.gen_range(0.0..TAU);
        self.float_speed = sample(rng, grid.float_speed_min, grid.float_speed_max);
        self.float_amplitude = sample(rng, grid.float_amplitude_min, grid.float_amplitude_max);
        self
    }

    pub fn with_motion(mut self, phase: f32, speed: f32, amplitude: f32) -> Self {
        self.float_phase = phase;
        self.float_speed = speed;
        self.float_amplitude = amplitude;
        self
    }

    pub fn home(&self) -> Point3<f32> {
        self.home
    }

    // Swap the rendered shape; kinematic state is untouched
    pub fn reskin(&mut self, shape: Shape) {
        self.shape = shape;
        self.shape.set_emissive_intensity(self.glow_intensity);
    }

    pub fn transform(&self) -> BodyTransform {
        BodyTransform {
            position: self.position,
            rotation: self.rotation,
            scale: self.shape.scale(),
            color: self.color,
            glow_intensity: self.glow_intensity,
        }
    }
}

fn sample<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

// Per-frame output for a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyTransform {
    pub position: Point3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: f32,
    pub color: Color,
    pub glow_intensity: f32,
}

impl BodyTransform {
    pub fn orientation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
    }

    // Local shape space -> world space
    pub fn similarity(&self) -> Similarity3<f32> {
        let isometry = Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation());
        Similarity3::from_isometry(isometry, self.scale)
    }
}
