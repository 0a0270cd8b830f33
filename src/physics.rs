/*
 * Physics Module
 *
 * This module holds the per-frame rules that move every body. Each body is
 * driven by five composed influences, applied in this order before the
 * position is integrated:
 * 1. Floating target: a sinusoidal offset around the home position
 * 2. Gravity: constant downward pull on the vertical velocity
 * 3. Pointer repulsion: planar push away from the pointer, linear falloff
 * 4. Collision avoidance: push away from every body closer than the radius
 * 5. Spring back toward the floating target
 * followed by damping, the x/y speed clamp, Euler integration and the
 * "lean into motion" orientation.
 *
 * Collisions read a snapshot of all positions taken at the start of the
 * frame, so the result does not depend on update order and the per-body
 * work can run in parallel.
 */

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::body::Body;
use crate::params::SimulationParams;
use crate::spatial_grid::SpatialGrid;

// What happened to one body during a frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepReport {
    // Repulsion force magnitude, None when out of reach
    pub push_force: Option<f32>,
    pub collisions: usize,
}

// Home position plus the body's individual floating offset at `time`
pub fn floating_target(body: &Body, time: f32) -> Point3<f32> {
    let phase = time * body.float_speed + body.float_phase;
    let float_y = phase.sin() * body.float_amplitude;
    let float_x = (time * body.float_speed * 0.7 + body.float_phase).cos() * body.float_amplitude * 0.5;
    let home = body.home();
    Point3::new(home.x + float_x, home.y + float_y, home.z)
}

// Magnitude of the pointer push at planar distance `distance`
pub fn push_magnitude(distance: f32, params: &SimulationParams) -> Option<f32> {
    if distance < params.push_radius && distance > params.distance_epsilon {
        Some((1.0 - distance / params.push_radius) * params.push_strength)
    } else {
        None
    }
}

// Planar repulsion velocity change and its magnitude; z is never pushed
pub fn pointer_push(
    position: &Point3<f32>,
    pointer: &Point3<f32>,
    params: &SimulationParams,
) -> Option<(Vector3<f32>, f32)> {
    let dx = position.x - pointer.x;
    let dy = position.y - pointer.y;
    let distance = (dx * dx + dy * dy).sqrt();

    let force = push_magnitude(distance, params)?;
    Some((Vector3::new(dx / distance * force, dy / distance * force, 0.0), force))
}

// Velocity change pushing `position` away from `other`
pub fn collision_push(
    position: &Point3<f32>,
    other: &Point3<f32>,
    params: &SimulationParams,
) -> Option<Vector3<f32>> {
    let offset = position - other;
    let distance = offset.norm();

    if distance < params.collision_radius && distance > params.distance_epsilon {
        let overlap = params.collision_radius - distance;
        let force = overlap * params.collision_strength;
        let direction = offset / distance;
        Some(Vector3::new(
            direction.x * force,
            direction.y * force,
            direction.z * force * params.collision_depth_factor,
        ))
    } else {
        None
    }
}

// Advance one body by one frame. `neighbours` are indices into `snapshot`.
pub fn advance_body(
    body: &mut Body,
    index: usize,
    time: f32,
    pointer: &Point3<f32>,
    snapshot: &[Point3<f32>],
    neighbours: &[usize],
    params: &SimulationParams,
) -> StepReport {
    let mut report = StepReport::default();

    // FLOATING - target position for the spring
    let target = floating_target(body, time);

    // GRAVITY
    body.velocity.y -= params.gravity;

    // POINTER - sideways push with linear falloff
    match pointer_push(&body.position, pointer, params) {
        Some((push, force)) => {
            body.velocity += push;
            body.glow_intensity = params.glow_base + force * params.glow_gain;
            report.push_force = Some(force);
        }
        None => {
            body.glow_intensity += (params.glow_rest - body.glow_intensity) * params.glow_smoothing;
        }
    }
    body.glow_intensity = body.glow_intensity.clamp(0.0, params.glow_max);

    // COLLISIONS - against start-of-frame positions
    let own = snapshot.get(index).copied().unwrap_or(body.position);
    for &other in neighbours {
        if other == index {
            continue;
        }
        if let Some(push) = snapshot.get(other).and_then(|p| collision_push(&own, p, params)) {
            body.velocity += push;
            report.collisions += 1;
        }
    }

    // SPRING back to the floating target
    body.velocity += (target - body.position) * params.spring_strength;

    // DAMPING
    body.velocity *= params.damping;

    // CLAMP - lateral speed only
    body.velocity.x = body.velocity.x.clamp(-params.max_speed, params.max_speed);
    body.velocity.y = body.velocity.y.clamp(-params.max_speed, params.max_speed);

    // INTEGRATE
    body.position += body.velocity;

    // ORIENTATION - lean into the motion
    body.rotation.x = body.velocity.y * params.tilt_factor;
    body.rotation.y = -body.velocity.x * params.tilt_factor;

    body.shape.set_emissive_intensity(body.glow_intensity);

    report
}

// Advance every body by one frame
pub fn update_bodies(
    bodies: &mut [Body],
    time: f32,
    pointer: &Point3<f32>,
    params: &SimulationParams,
    spatial_grid: &mut SpatialGrid,
) -> Vec<StepReport> {
    let snapshot: Vec<Point3<f32>> = bodies.iter().map(|body| body.position).collect();
    let all: Vec<usize> = if params.enable_spatial_grid {
        spatial_grid.rebuild(params.collision_radius, &snapshot);
        Vec::new()
    } else {
        (0..bodies.len()).collect()
    };
    let grid: &SpatialGrid = spatial_grid;

    let step = |(i, body): (usize, &mut Body)| {
        if params.enable_spatial_grid {
            let nearby = grid.get_nearby_indices(&snapshot[i]);
            advance_body(body, i, time, pointer, &snapshot, &nearby, params)
        } else {
            advance_body(body, i, time, pointer, &snapshot, &all, params)
        }
    };

    if params.enable_parallel {
        bodies.par_iter_mut().enumerate().map(step).collect()
    } else {
        bodies.iter_mut().enumerate().map(step).collect()
    }
}
