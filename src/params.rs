/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that holds every force
 * constant used by the per-frame physics, and the GridConfig struct that
 * describes the rest lattice the bodies are built on. Both are fixed at
 * construction time; the UI may still nudge the interaction constants live.
 */

use serde::Deserialize;

// Constants driving the per-frame physics and the execution strategy
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    // Pointer repulsion
    pub push_radius: f32,
    pub push_strength: f32,
    // Spring back to the floating target
    pub spring_strength: f32,
    pub damping: f32,
    pub gravity: f32,
    // Applied to x and y only
    pub max_speed: f32,
    // Pairwise collision avoidance
    pub collision_radius: f32,
    pub collision_strength: f32,
    pub collision_depth_factor: f32,
    // Distances at or below this skip the force
    pub distance_epsilon: f32,
    // Glow (emissive intensity)
    pub glow_rest: f32,
    pub glow_base: f32,
    pub glow_gain: f32,
    pub glow_smoothing: f32,
    pub glow_max: f32,
    // Rotation per unit of velocity
    pub tilt_factor: f32,
    // Nominal clock advance per frame
    pub time_step: f32,
    // Performance settings
    pub enable_parallel: bool,
    pub enable_spatial_grid: bool,
    // Host settings
    pub show_debug: bool,
    pub pause_simulation: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            push_radius: 3.2,
            push_strength: 0.4,
            spring_strength: 0.025,
            damping: 0.93,
            gravity: 0.012,
            max_speed: 0.4,
            collision_radius: 1.6,
            collision_strength: 0.015,
            collision_depth_factor: 0.3,
            distance_epsilon: 0.01,
            glow_rest: 0.15,
            glow_base: 0.4,
            glow_gain: 0.6,
            glow_smoothing: 0.1,
            glow_max: 1.0,
            tilt_factor: 0.5,
            time_step: 0.016,
            enable_parallel: false,
            enable_spatial_grid: false,
            show_debug: false,
            pause_simulation: false,
        }
    }
}

impl SimulationParams {
    // Resting body offset below its floating target where gravity and spring balance
    pub fn gravity_sag(&self) -> f32 {
        if self.spring_strength > 0.0 {
            self.gravity / self.spring_strength
        } else {
            0.0
        }
    }

    // Get parameter ranges for UI sliders
    pub fn get_push_radius_range() -> std::ops::RangeInclusive<f32> {
        0.5..=8.0
    }

    pub fn get_push_strength_range() -> std::ops::RangeInclusive<f32> {
        0.0..=1.5
    }

    pub fn get_spring_strength_range() -> std::ops::RangeInclusive<f32> {
        0.005..=0.2
    }

    pub fn get_gravity_range() -> std::ops::RangeInclusive<f32> {
        0.0..=0.05
    }
}

// Shape of the rest lattice and the per-body randomisation ranges
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: usize,
    pub rows: usize,
    pub spacing: f32,
    pub palette: Vec<u32>,
    pub float_speed_min: f32,
    pub float_speed_max: f32,
    pub float_amplitude_min: f32,
    pub float_amplitude_max: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 14,
            spacing: 2.6,
            palette: vec![0x00ffff, 0xff00ff, 0x00ff88, 0xffaa00, 0x8855ff],
            float_speed_min: 0.5,
            float_speed_max: 1.0,
            float_amplitude_min: 0.2,
            float_amplitude_max: 0.35,
        }
    }
}

impl GridConfig {
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Centered lattice coordinate of column x, row y
    pub fn home_position(&self, x: usize, y: usize) -> (f32, f32) {
        let base_x = (x as f32 - self.columns as f32 / 2.0 + 0.5) * self.spacing;
        let base_y = (y as f32 - self.rows as f32 / 2.0 + 0.5) * self.spacing;
        (base_x, base_y)
    }

    // Palette colour cycling along the diagonals
    pub fn color_at(&self, x: usize, y: usize) -> u32 {
        if self.palette.is_empty() {
            return 0xffffff;
        }
        self.palette[(x + y) % self.palette.len()]
    }

    pub fn get_dimension_range() -> std::ops::RangeInclusive<usize> {
        1..=60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_is_centered() {
        let grid = GridConfig { columns: 2, rows: 1, spacing: 2.0, ..Default::default() };
        assert_eq!(grid.home_position(0, 0), (-1.0, 0.0));
        assert_eq!(grid.home_position(1, 0), (1.0, 0.0));
    }

    #[test]
    fn colors_cycle_along_diagonals() {
        let grid = GridConfig::default();
        assert_eq!(grid.color_at(0, 0), 0x00ffff);
        assert_eq!(grid.color_at(1, 0), grid.color_at(0, 1));
        assert_eq!(grid.color_at(5, 0), 0x00ffff);
    }

    #[test]
    fn empty_palette_falls_back_to_white() {
        let grid = GridConfig { palette: Vec::new(), ..Default::default() };
        assert_eq!(grid.color_at(3, 4), 0xffffff);
    }

    #[test]
    fn sag_balances_gravity_against_spring() {
        let params = SimulationParams::default();
        assert!((params.gravity_sag() - 0.48).abs() < 1e-6);
        let springless = SimulationParams { spring_strength: 0.0, ..Default::default() };
        assert_eq!(springless.gravity_sag(), 0.0);
    }
}
