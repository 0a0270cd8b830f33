/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains frame metrics and
 * other debug information to be displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second)
 * - Frame time
 * - Physics steps run this frame
 * - Bodies currently pushed by the pointer and collision contacts
 * - Pointer state and the resolved world point
 */

use std::time::Duration;

use nalgebra::Point3;

use crate::simulation::FrameStats;

// Debug information to display
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    pub physics_updates_per_frame: usize,
    pub frame_stats: FrameStats,
    pub pointer_active: bool,
    pub pointer_world: Option<Point3<f32>>,
    pub template_name: Option<String>,
    pub last_error: Option<String>,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            physics_updates_per_frame: 0,
            frame_stats: FrameStats::default(),
            pointer_active: false,
            pointer_world: None,
            template_name: None,
            last_error: None,
        }
    }
}

impl DebugInfo {
    // Lines shown in the overlay and the UI panel
    pub fn lines(&self, body_count: usize) -> Vec<String> {
        let pointer = match self.pointer_world {
            Some(p) if self.pointer_active => format!("Pointer: ({:.2}, {:.2})", p.x, p.y),
            _ => "Pointer: none".to_string(),
        };
        vec![
            format!("FPS: {:.1}", self.fps),
            format!("Frame time: {:.2} ms", self.frame_time.as_secs_f64() * 1000.0),
            format!("Bodies: {}", body_count),
            format!("Physics steps: {}", self.physics_updates_per_frame),
            format!("Pushed: {}", self.frame_stats.pushed_bodies),
            format!("Contacts: {}", self.frame_stats.collisions),
            pointer,
            format!("Model: {}", self.template_name.as_deref().unwrap_or("default boxes")),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_pointer_is_reported_as_none() {
        let mut info = DebugInfo::default();
        info.pointer_world = Some(Point3::new(1.0, 2.0, 0.0));
        assert!(info.lines(3).contains(&"Pointer: none".to_string()));

        info.pointer_active = true;
        assert!(info.lines(3).contains(&"Pointer: (1.00, 2.00)".to_string()));
        assert!(info.lines(3).contains(&"Model: default boxes".to_string()));
    }
}
