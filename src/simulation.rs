/*
 * Simulation Module
 *
 * This module owns the fixed collection of bodies laid out on the rest
 * lattice and the simulation clock. Each frame it advances every body with
 * the rules in the physics module and exposes the resulting transforms.
 *
 * SimulationContext bundles the state that lives outside the bodies (the
 * pointer slot, the active template and the camera) so a frame can be driven
 * without a rendering host.
 */

use nalgebra::Point3;
use rand::Rng;

use crate::body::{Body, BodyTransform};
use crate::camera::Camera;
use crate::params::{GridConfig, SimulationParams};
use crate::physics::{self, StepReport};
use crate::pointer::{self, PointerSignal, PointerSlot};
use crate::shape::Color;
use crate::spatial_grid::SpatialGrid;
use crate::template::TemplateSlot;

// Aggregate of one frame's step reports
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    pub pushed_bodies: usize,
    pub collisions: usize,
    pub max_push_force: f32,
}

impl FrameStats {
    fn from_reports(reports: &[StepReport]) -> Self {
        let mut stats = FrameStats::default();
        for report in reports {
            if let Some(force) = report.push_force {
                stats.pushed_bodies += 1;
                stats.max_push_force = stats.max_push_force.max(force);
            }
            stats.collisions += report.collisions;
        }
        stats
    }
}

pub struct BodySimulation {
    bodies: Vec<Body>,
    pub params: SimulationParams,
    grid: GridConfig,
    time: f32,
    frame: u64,
    spatial_grid: SpatialGrid,
    last_stats: FrameStats,
}

impl BodySimulation {
    // Build the lattice with thread-local randomness
    pub fn new(grid: GridConfig, params: SimulationParams, templates: &TemplateSlot) -> Self {
        Self::with_rng(grid, params, templates, &mut rand::thread_rng())
    }

    // Build the lattice row by row, one body per cell
    pub fn with_rng<R: Rng + ?Sized>(
        grid: GridConfig,
        params: SimulationParams,
        templates: &TemplateSlot,
        rng: &mut R,
    ) -> Self {
        let mut bodies = Vec::with_capacity(grid.len());
        for y in 0..grid.rows {
            for x in 0..grid.columns {
                let color = Color::from_hex(grid.color_at(x, y));
                let (base_x, base_y) = grid.home_position(x, y);
                let body = Body::new(Point3::new(base_x, base_y, 0.0), color, templates.instantiate(color))
                    .with_random_motion(&grid, rng);
                bodies.push(body);
            }
        }

        tracing::debug!(columns = grid.columns, rows = grid.rows, bodies = bodies.len(), "lattice built");
        Self::assemble(bodies, grid, params)
    }

    // Use prepared bodies as-is
    pub fn from_bodies(bodies: Vec<Body>, params: SimulationParams) -> Self {
        let grid = GridConfig { columns: bodies.len(), rows: 1, ..GridConfig::default() };
        Self::assemble(bodies, grid, params)
    }

    fn assemble(bodies: Vec<Body>, grid: GridConfig, params: SimulationParams) -> Self {
        let spatial_grid = SpatialGrid::new(params.collision_radius);
        Self {
            bodies,
            params,
            grid,
            time: 0.0,
            frame: 0,
            spatial_grid,
            last_stats: FrameStats::default(),
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    // Advance the clock by `dt` and every body by one frame
    pub fn update(&mut self, dt: f32, world_point: Point3<f32>) -> FrameStats {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
        let pointer = if world_point.coords.iter().all(|c| c.is_finite()) {
            world_point
        } else {
            pointer::far_away()
        };

        let reports = physics::update_bodies(&mut self.bodies, self.time, &pointer, &self.params, &mut self.spatial_grid);
        self.frame += 1;
        self.last_stats = FrameStats::from_reports(&reports);
        self.last_stats
    }

    // One frame at the nominal time step
    pub fn step(&mut self, world_point: Point3<f32>) -> FrameStats {
        let dt = self.params.time_step;
        self.update(dt, world_point)
    }

    // Resolve the context's pointer and advance one frame
    pub fn update_with_context(&mut self, context: &SimulationContext, dt: f32) -> FrameStats {
        let world_point = context.world_point();
        self.update(dt, world_point)
    }

    // Replace every body's shape from the template slot; motion state is kept
    pub fn reskin(&mut self, templates: &TemplateSlot) {
        for body in &mut self.bodies {
            let shape = templates.instantiate(body.color);
            body.reskin(shape);
        }
        tracing::info!(
            bodies = self.bodies.len(),
            custom = templates.is_custom(),
            "bodies re-skinned"
        );
    }

    pub fn transforms(&self) -> Vec<BodyTransform> {
        self.bodies.iter().map(Body::transform).collect()
    }
}

// State shared by the frame loop that does not belong to any body
#[derive(Debug, Clone, Default)]
pub struct SimulationContext {
    pub pointer: PointerSlot,
    pub templates: TemplateSlot,
    pub camera: Camera,
}

impl SimulationContext {
    pub fn new(camera: Camera) -> Self {
        Self { pointer: PointerSlot::new(), templates: TemplateSlot::new(), camera }
    }

    pub fn signal(&self) -> PointerSignal {
        self.pointer.latest()
    }

    // Latest pointer signal projected into the world
    pub fn world_point(&self) -> Point3<f32> {
        pointer::resolve(self.signal(), &self.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_grid() -> GridConfig {
        GridConfig { columns: 4, rows: 3, ..GridConfig::default() }
    }

    #[test]
    fn lattice_has_one_body_per_cell() {
        let mut rng = StdRng::seed_from_u64(1);
        let sim = BodySimulation::with_rng(small_grid(), SimulationParams::default(), &TemplateSlot::new(), &mut rng);
        assert_eq!(sim.bodies().len(), 12);
        assert!((sim.bodies()[0].home() - Point3::new(-3.9, -2.6, 0.0)).norm() < 1e-5);
        assert_eq!(sim.bodies()[0].color, Color(0x00ffff));
        assert_eq!(sim.bodies()[1].color, Color(0xff00ff));
    }

    #[test]
    fn update_advances_clock_and_frame() {
        let mut sim = BodySimulation::new(small_grid(), SimulationParams::default(), &TemplateSlot::new());
        sim.step(pointer::far_away());
        sim.update(0.032, pointer::far_away());
        assert!((sim.time() - 0.048).abs() < 1e-6);
        assert_eq!(sim.frame(), 2);
    }

    #[test]
    fn bad_inputs_do_not_poison_state() {
        let mut sim = BodySimulation::new(small_grid(), SimulationParams::default(), &TemplateSlot::new());
        sim.update(f32::NAN, Point3::new(f32::NAN, 0.0, 0.0));
        sim.update(-1.0, Point3::new(f32::INFINITY, 0.0, 0.0));
        assert_eq!(sim.time(), 0.0);
        assert!(sim.bodies().iter().all(|b| b.position.coords.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn stats_count_pushed_bodies() {
        let mut sim = BodySimulation::new(small_grid(), SimulationParams::default(), &TemplateSlot::new());
        let stats = sim.step(Point3::new(0.0, 0.0, 0.0));
        assert!(stats.pushed_bodies > 0);
        assert!(stats.max_push_force > 0.0);
        assert_eq!(sim.step(pointer::far_away()).pushed_bodies, 0);
    }

    #[test]
    fn context_resolves_latest_signal() {
        let context = SimulationContext::new(Camera::new());
        assert_eq!(context.world_point(), pointer::far_away());
        context.pointer.publish(PointerSignal::normalized(0.5, 0.5));
        assert!((context.world_point() - Point3::origin()).norm() < 1e-4);
    }
}
