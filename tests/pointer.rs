use std::io::Cursor;

use hoverfield::{far_away, resolve, tracker, BodySimulation, Camera, PointerSignal, PointerSlot, SimulationContext};
use hoverfield::{GridConfig, SimulationParams, TemplateSlot};
use nalgebra::Point3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn square_camera() -> Camera {
    Camera { aspect: 1.0, ..Camera::new() }
}

#[test]
fn absent_signal_always_resolves_far_away() {
    let camera = Camera::new();
    for _ in 0..3 {
        assert_eq!(resolve(PointerSignal::Absent, &camera), far_away());
    }
}

#[test]
fn screen_center_lands_on_origin() {
    let point = resolve(PointerSignal::normalized(0.5, 0.5), &square_camera());
    assert!((point - Point3::origin()).norm() < 1e-4);
}

#[test]
fn screen_corners_land_on_plane_edges() {
    let camera = square_camera();
    // top-left of the screen is -x, +y in the world
    let top_left = resolve(PointerSignal::normalized(0.0, 0.0), &camera);
    assert!((top_left - Point3::new(-15.0, 15.0, 0.0)).norm() < 1e-2);

    let bottom_right = resolve(PointerSignal::normalized(1.0, 1.0), &camera);
    assert!((bottom_right - Point3::new(15.0, -15.0, 0.0)).norm() < 1e-2);
    assert_eq!(bottom_right.z, 0.0);
}

#[test]
fn last_published_signal_wins() {
    let slot = PointerSlot::new();
    let writer = slot.clone();
    writer.publish(PointerSignal::normalized(0.1, 0.2));
    writer.publish(PointerSignal::normalized(0.7, 0.3));
    assert_eq!(slot.latest(), PointerSignal::Normalized { x: 0.7, y: 0.3 });

    writer.clear();
    assert_eq!(slot.latest(), PointerSignal::Absent);
}

#[test]
fn tracker_stream_drives_the_slot() {
    let slot = PointerSlot::new();
    let input = Cursor::new("0.5 0.5\n# comment\n0.25,0.75\nnot a sample\n");
    let samples = tracker::pump(input, &slot);
    assert_eq!(samples, 2);
    // End of stream means the tracker is gone
    assert_eq!(slot.latest(), PointerSignal::Absent);
}

#[test]
fn tracker_thread_reports_sample_count() {
    let slot = PointerSlot::new();
    let handle = tracker::spawn(Cursor::new("0.1 0.1\nnone\n0.9 0.9\n"), slot.clone());
    assert_eq!(handle.join().unwrap(), 3);
    assert!(!slot.latest().is_present());
}

#[test]
fn context_pointer_pushes_bodies_near_it() {
    let grid = GridConfig { columns: 5, rows: 5, ..GridConfig::default() };
    let mut rng = StdRng::seed_from_u64(3);
    let mut sim = BodySimulation::with_rng(grid, SimulationParams::default(), &TemplateSlot::new(), &mut rng);
    let context = SimulationContext::new(square_camera());

    context.pointer.publish(PointerSignal::normalized(0.5, 0.5));
    let stats = sim.update_with_context(&context, 0.016);
    assert!(stats.pushed_bodies > 0);
    assert!(stats.max_push_force <= SimulationParams::default().push_strength);

    context.pointer.clear();
    let stats = sim.update_with_context(&context, 0.016);
    assert_eq!(stats.pushed_bodies, 0);
}
