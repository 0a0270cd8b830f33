/*
 * UI Module
 *
 * This module contains functions for creating and updating the user interface
 * using nannou_egui. It provides controls for the interaction constants, the
 * lattice size and the model used for the bodies, and reports which bulk
 * actions the user asked for this frame.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::{GridConfig, SimulationParams};

// Bulk operations requested from the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiActions {
    pub load_template: bool,
    pub reset_template: bool,
    pub rebuild_grid: bool,
}

// Update the UI and return the requested actions
pub fn update_ui(
    egui: &mut Egui,
    params: &mut SimulationParams,
    grid: &mut GridConfig,
    model_path: &mut String,
    debug_info: &DebugInfo,
    body_count: usize,
    custom_active: bool,
) -> UiActions {
    let mut actions = UiActions::default();

    let ctx = egui.begin_frame();

    egui::Window::new("Hoverfield")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Custom 3D Model", |ui| {
                ui.text_edit_singleline(model_path);
                if ui.button("Load Model").clicked() {
                    actions.load_template = true;
                }
                if custom_active && ui.button("Reset to Default Boxes").clicked() {
                    actions.reset_template = true;
                }
                ui.label("Supported: GLB, GLTF, OBJ");
                if let Some(error) = &debug_info.last_error {
                    ui.colored_label(egui::Color32::RED, error.as_str());
                }
            });

            ui.collapsing("Interaction", |ui| {
                ui.add(egui::Slider::new(&mut params.push_radius, SimulationParams::get_push_radius_range()).text("Push Radius"));
                ui.add(egui::Slider::new(&mut params.push_strength, SimulationParams::get_push_strength_range()).text("Push Strength"));
                ui.add(egui::Slider::new(&mut params.spring_strength, SimulationParams::get_spring_strength_range()).text("Spring Strength"));
                ui.add(egui::Slider::new(&mut params.gravity, SimulationParams::get_gravity_range()).text("Gravity"));
            });

            ui.collapsing("Grid", |ui| {
                ui.add(egui::Slider::new(&mut grid.columns, GridConfig::get_dimension_range()).text("Columns"));
                ui.add(egui::Slider::new(&mut grid.rows, GridConfig::get_dimension_range()).text("Rows"));
                if ui.button("Rebuild Grid").clicked() {
                    actions.rebuild_grid = true;
                }
            });

            ui.collapsing("Performance Tuning", |ui| {
                ui.checkbox(&mut params.enable_parallel, "Enable Parallel Processing");
                ui.checkbox(&mut params.enable_spatial_grid, "Enable Spatial Grid");

                ui.separator();

                for line in debug_info.lines(body_count) {
                    ui.label(line);
                }
            });

            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    actions
}

// Draw debug information on the screen
pub fn draw_debug_info(
    draw: &nannou::Draw,
    debug_info: &DebugInfo,
    window_rect: nannou::geom::Rect,
    body_count: usize,
) {
    let lines = debug_info.lines(body_count);

    // Background panel in the bottom-left corner
    let margin = 20.0;
    let line_height = 20.0;
    let panel_width = 220.0;
    let panel_height = line_height * lines.len() as f32 + margin;
    let panel_x = window_rect.left() + panel_width / 2.0;
    let panel_y = window_rect.bottom() + panel_height / 2.0;

    draw.rect()
        .x_y(panel_x, panel_y)
        .w_h(panel_width, panel_height)
        .color(nannou::color::rgba(0.0, 0.0, 0.0, 0.7));

    let text_x = window_rect.left() + margin;
    let text_y = window_rect.bottom() + panel_height - margin;

    for (i, text) in lines.iter().enumerate() {
        let y = text_y - (i as f32 * line_height);
        draw.text(text)
            .x_y(text_x + 80.0, y)
            .color(nannou::color::WHITE)
            .font_size(14);
    }
}
