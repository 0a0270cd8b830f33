/*
 * Floating Grid Benchmark
 *
 * This file contains benchmarks for the floating grid to identify performance
 * bottlenecks. It measures pointer resolution, spatial grid rebuilds and the
 * full per-frame update with the pairwise and cell-based collision passes,
 * sequentially and in parallel.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use hoverfield::{
    resolve, BodySimulation, Camera, GridConfig, PointerSignal, SimulationParams, SpatialGrid, TemplateSlot,
};

// Square lattices from the default 20x14 up to a few thousand bodies
const LATTICE_SIDES: [usize; 4] = [10, 20, 40, 60];

fn lattice(side: usize, params: SimulationParams) -> BodySimulation {
    let grid = GridConfig { columns: side, rows: side, ..GridConfig::default() };
    let mut rng = StdRng::seed_from_u64(42);
    BodySimulation::with_rng(grid, params, &TemplateSlot::new(), &mut rng)
}

// Benchmark projecting the pointer onto the lattice plane
fn bench_pointer_resolve(c: &mut Criterion) {
    let camera = Camera::new();
    let signal = PointerSignal::normalized(0.3, 0.6);
    c.bench_function("pointer_resolve", |b| {
        b.iter(|| black_box(resolve(black_box(signal), &camera)));
    });
}

// Benchmark bucketing every body into collision cells
fn bench_spatial_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("spatial_grid");

    for side in LATTICE_SIDES.iter() {
        group.bench_with_input(BenchmarkId::from_parameter(side * side), side, |b, &side| {
            let sim = lattice(side, SimulationParams::default());
            let positions: Vec<Point3<f32>> = sim.bodies().iter().map(|body| body.position).collect();
            let mut grid = SpatialGrid::new(sim.params.collision_radius);

            b.iter(|| {
                grid.rebuild(1.6, black_box(&positions));
                black_box(grid.get_nearby_indices(&positions[0]).len());
            });
        });
    }

    group.finish();
}

// Benchmark the full frame with each execution strategy
fn bench_update_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_loop");

    let strategies = [
        ("pairwise", false, false),
        ("pairwise_parallel", false, true),
        ("cells", true, false),
        ("cells_parallel", true, true),
    ];

    for &(name, enable_spatial_grid, enable_parallel) in strategies.iter() {
        for side in LATTICE_SIDES.iter() {
            let id = BenchmarkId::new(name, side * side);
            group.bench_with_input(id, side, |b, &side| {
                let params = SimulationParams { enable_spatial_grid, enable_parallel, ..SimulationParams::default() };
                let mut sim = lattice(side, params);
                let pointer = Point3::new(1.0, -0.5, 0.0);

                b.iter(|| black_box(sim.step(black_box(pointer))));
            });
        }
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_pointer_resolve, bench_spatial_grid, bench_update_loop
}

criterion_main!(benches);
