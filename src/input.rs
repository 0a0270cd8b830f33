/*
 * Input Module
 *
 * This module handles window events for the floating grid. The mouse stands
 * in for a tracked fingertip: its window position is normalized into a
 * pointer signal and published to the shared slot. Leaving the window (or
 * hovering the control panel) counts as losing the signal.
 */

use nannou::prelude::*;

use crate::app::Model;
use crate::pointer::PointerSignal;

// Mouse moved event handler
pub fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    if !model.mouse_pointer {
        return;
    }

    // Don't push bodies around while using the controls
    if model.egui.ctx().is_pointer_over_area() {
        model.context.pointer.clear();
        return;
    }

    let window_rect = app.window_rect();
    let signal = normalize(pos.x, pos.y, window_rect);
    model.context.pointer.publish(signal);
}

// Mouse left the window
pub fn mouse_exited(_app: &App, model: &mut Model) {
    if model.mouse_pointer {
        model.context.pointer.clear();
    }
}

// Keep the projection in step with the window
pub fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.context.camera.resize(size.x, size.y);
}

// Handle raw window events for egui
pub fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

// Window coordinates (origin at the center, y up) -> x right, y down in 0..=1
pub fn normalize(x: f32, y: f32, window_rect: Rect) -> PointerSignal {
    if window_rect.w() <= 0.0 || window_rect.h() <= 0.0 {
        return PointerSignal::Absent;
    }
    let nx = (x - window_rect.left()) / window_rect.w();
    let ny = (window_rect.top() - y) / window_rect.h();
    PointerSignal::normalized(nx, ny)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_corners_map_to_unit_square() {
        let rect = Rect::from_w_h(800.0, 600.0);
        assert_eq!(normalize(-400.0, 300.0, rect), PointerSignal::Normalized { x: 0.0, y: 0.0 });
        assert_eq!(normalize(400.0, -300.0, rect), PointerSignal::Normalized { x: 1.0, y: 1.0 });
        assert_eq!(normalize(0.0, 0.0, rect), PointerSignal::Normalized { x: 0.5, y: 0.5 });
    }

    #[test]
    fn degenerate_window_has_no_signal() {
        assert_eq!(normalize(0.0, 0.0, Rect::from_w_h(0.0, 0.0)), PointerSignal::Absent);
    }
}
