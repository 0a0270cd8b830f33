/*
 * Floating Grid Simulation - Module Definitions
 *
 * This file defines the module structure for the floating grid. The
 * simulation core (bodies, physics, pointer resolution, templates) has no
 * dependency on a window; the app, input, renderer and ui modules host it
 * in a nannou window.
 */

// Re-export key components for easier access
pub use body::{Body, BodyTransform};
pub use camera::{Camera, Ray};
pub use config::{ConfigError, SceneConfig};
pub use params::{GridConfig, SimulationParams};
pub use pointer::{far_away, resolve, PointerSignal, PointerSlot};
pub use shape::{Color, Material, Mesh, Shape, ShapeNode};
pub use simulation::{BodySimulation, FrameStats, SimulationContext};
pub use spatial_grid::SpatialGrid;
pub use template::{load_template, ObjectTemplate, TemplateError, TemplateSlot};

// Define modules
pub mod body;
pub mod camera;
pub mod config;
pub mod params;
pub mod physics;
pub mod pointer;
pub mod shape;
pub mod simulation;
pub mod spatial_grid;
pub mod template;
pub mod tracker;
pub mod cli;
pub mod debug;
pub mod app;
pub mod input;
pub mod renderer;
pub mod ui;
