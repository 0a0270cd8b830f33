/*
 * Application Module
 *
 * This module defines the nannou application model for the floating grid.
 * It wires the simulation to a window: the mouse (or an external tracker on
 * stdin) feeds the pointer slot, the physics runs on a fixed timestep, and
 * the renderer reads the per-body transforms every frame.
 */

use std::path::Path;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use clap::Parser;
use nannou::prelude::*;
use nannou_egui::Egui;

use crate::cli::Args;
use crate::config::SceneConfig;
use crate::debug::DebugInfo;
use crate::input::{mouse_exited, mouse_moved, raw_window_event, resized};
use crate::params::GridConfig;
use crate::renderer::view;
use crate::simulation::{BodySimulation, SimulationContext};
use crate::tracker;
use crate::ui::{self, UiActions};

// Catch-up limit so a long stall does not freeze the window
const MAX_STEPS_PER_FRAME: usize = 5;

// Main model for the application
pub struct Model {
    pub simulation: BodySimulation,
    pub context: SimulationContext,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    // Grid edited in the UI, applied on rebuild
    pub pending_grid: GridConfig,
    // Model path typed in the UI
    pub model_path: String,
    // Mouse drives the pointer unless an external tracker does
    pub mouse_pointer: bool,
    pub tracker: Option<JoinHandle<usize>>,
    // Fixed timestep physics variables
    pub physics_accumulator: Duration,
    pub physics_step_size: Duration,
    pub last_update_time: Instant,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let args = Args::parse();
    let scene = args.scene().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "falling back to the default scene");
        SceneConfig::default()
    });

    // Create the main window
    let window_id = app
        .new_window()
        .title("Hoverfield")
        .size(1280, 720)
        .view(view)
        .mouse_moved(mouse_moved)
        .mouse_exited(mouse_exited)
        .resized(resized)
        .raw_event(raw_window_event)
        .build()
        .expect("failed to build window");

    let window = app.window(window_id).expect("window vanished after creation");
    let egui = Egui::from_window(&window);
    let (width, height) = window.inner_size_points();

    let mut context = SimulationContext::new(scene.camera.clone());
    context.camera.resize(width, height);

    let mut debug_info = DebugInfo::default();
    if let Some(path) = &scene.template {
        // A broken model file leaves the default boxes in place
        if let Err(err) = context.templates.load(path) {
            debug_info.last_error = Some(err.to_string());
        }
    }
    debug_info.template_name = context.templates.active().map(|t| t.name.clone());

    let simulation = BodySimulation::new(scene.grid.clone(), scene.physics.clone(), &context.templates);
    let physics_step_size = Duration::from_secs_f32(scene.physics.time_step.max(0.001));

    let tracker = if args.pointer_stdin {
        let stdin = std::io::BufReader::new(std::io::stdin());
        Some(tracker::spawn(stdin, context.pointer.clone()))
    } else {
        None
    };

    Model {
        simulation,
        context,
        egui,
        debug_info,
        pending_grid: scene.grid,
        model_path: scene.template.map(|p| p.display().to_string()).unwrap_or_default(),
        mouse_pointer: !args.pointer_stdin,
        tracker,
        physics_accumulator: Duration::ZERO,
        physics_step_size,
        last_update_time: Instant::now(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let body_count = model.simulation.bodies().len();
    let actions = ui::update_ui(
        &mut model.egui,
        &mut model.simulation.params,
        &mut model.pending_grid,
        &mut model.model_path,
        &model.debug_info,
        body_count,
        model.context.templates.is_custom(),
    );
    apply_actions(model, actions);

    if model.tracker.as_ref().map_or(false, |handle| handle.is_finished()) {
        model.tracker = None;
    }

    let current_time = Instant::now();
    model.physics_accumulator += current_time.duration_since(model.last_update_time);
    model.last_update_time = current_time;

    // Read the pointer once per frame
    let world_point = model.context.world_point();
    model.debug_info.pointer_active = model.context.signal().is_present();
    model.debug_info.pointer_world = Some(world_point);

    if model.simulation.params.pause_simulation {
        model.physics_accumulator = Duration::ZERO;
        model.debug_info.physics_updates_per_frame = 0;
        return;
    }

    let mut physics_updates_this_frame = 0;
    while model.physics_accumulator >= model.physics_step_size && physics_updates_this_frame < MAX_STEPS_PER_FRAME {
        model.simulation.step(world_point);
        model.physics_accumulator -= model.physics_step_size;
        physics_updates_this_frame += 1;
    }
    if physics_updates_this_frame == MAX_STEPS_PER_FRAME {
        model.physics_accumulator = Duration::ZERO;
    }

    model.debug_info.physics_updates_per_frame = physics_updates_this_frame;
    model.debug_info.frame_stats = model.simulation.last_stats();
}

fn apply_actions(model: &mut Model, actions: UiActions) {
    if actions.load_template {
        let path = model.model_path.trim().to_string();
        match model.context.templates.load(Path::new(&path)) {
            Ok(()) => {
                model.simulation.reskin(&model.context.templates);
                model.debug_info.last_error = None;
            }
            Err(err) => model.debug_info.last_error = Some(err.to_string()),
        }
    }

    if actions.reset_template {
        model.context.templates.clear();
        model.simulation.reskin(&model.context.templates);
        model.debug_info.last_error = None;
    }

    if actions.rebuild_grid {
        let params = model.simulation.params.clone();
        model.simulation = BodySimulation::new(model.pending_grid.clone(), params, &model.context.templates);
    }

    model.debug_info.template_name = model.context.templates.active().map(|t| t.name.clone());
}
