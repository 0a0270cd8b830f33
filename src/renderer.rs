/*
 * Renderer Module
 *
 * This module draws the floating grid. Each body's shape is transformed by
 * its per-frame transform, projected through the perspective camera and
 * drawn as flat-shaded, semi-transparent triangles whose brightness follows
 * the body's glow. A ring marks the pointer while a signal is present.
 */

use nannou::prelude::*;

use nalgebra::{Point3, Vector3};

use crate::app::Model;
use crate::body::Body;
use crate::camera::Camera;
use crate::pointer::PointerSignal;
use crate::ui;

// Base lighting before emissive glow is added
const AMBIENT: f32 = 0.35;
const DIFFUSE: f32 = 0.45;

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(WHITE);

    let window_rect = app.window_rect();
    let camera = &model.context.camera;
    let light = Vector3::new(0.3, 0.4, 1.0).normalize();

    // Far bodies first so nearer translucent ones blend over them
    let bodies = model.simulation.bodies();
    let mut order: Vec<usize> = (0..bodies.len()).collect();
    order.sort_by(|&a, &b| bodies[a].position.z.total_cmp(&bodies[b].position.z));

    for &i in &order {
        draw_body(&draw, camera, &bodies[i], &light, window_rect);
    }

    draw_pointer(&draw, model.context.signal(), window_rect);

    if model.simulation.params.show_debug {
        ui::draw_debug_info(&draw, &model.debug_info, window_rect, bodies.len());
    }

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn draw_body(draw: &Draw, camera: &Camera, body: &Body, light: &Vector3<f32>, window_rect: Rect) {
    let to_world = body.transform().similarity();
    let (w, h) = (window_rect.w(), window_rect.h());

    for part in body.shape.parts() {
        let (r, g, b) = part.material.color.components();
        let emissive = part.material.emissive_intensity;
        let alpha = if part.material.transparent { part.material.opacity } else { 1.0 };

        for triangle in &part.mesh.triangles {
            let world: [Point3<f32>; 3] = [
                to_world * part.mesh.vertices[triangle[0]],
                to_world * part.mesh.vertices[triangle[1]],
                to_world * part.mesh.vertices[triangle[2]],
            ];

            let screen = match (
                camera.world_to_screen(&world[0], w, h),
                camera.world_to_screen(&world[1], w, h),
                camera.world_to_screen(&world[2], w, h),
            ) {
                (Some(a), Some(b), Some(c)) => [a, b, c],
                _ => continue,
            };

            // Skip faces turned away from the camera
            let winding = (screen[1] - screen[0]).perp(&(screen[2] - screen[0]));
            if winding <= 0.0 {
                continue;
            }

            let normal = (world[1] - world[0]).cross(&(world[2] - world[0]));
            let diffuse = normal.try_normalize(f32::EPSILON).map_or(0.0, |n| n.dot(light).max(0.0));
            let shade = AMBIENT + DIFFUSE * diffuse + emissive;

            draw.tri()
                .points(
                    pt2(screen[0].x, screen[0].y),
                    pt2(screen[1].x, screen[1].y),
                    pt2(screen[2].x, screen[2].y),
                )
                .color(rgba((r * shade).min(1.0), (g * shade).min(1.0), (b * shade).min(1.0), alpha));
        }
    }
}

// Small translucent ring following the tracked point
fn draw_pointer(draw: &Draw, signal: PointerSignal, window_rect: Rect) {
    if let PointerSignal::Normalized { x, y } = signal {
        let screen_x = window_rect.left() + x * window_rect.w();
        let screen_y = window_rect.top() - y * window_rect.h();
        draw.ellipse()
            .x_y(screen_x, screen_y)
            .radius(25.0)
            .color(rgba(0.0, 1.0, 1.0, 0.1))
            .stroke(rgba(0.0, 1.0, 1.0, 0.6))
            .stroke_weight(2.0);
    }
}
