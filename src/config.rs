/*
 * Scene Configuration Module
 *
 * This module loads the scene (grid, physics, camera and an optional model
 * file) from YAML. Every section is optional and falls back to the built-in
 * defaults, so a file only needs the values it changes:
 *
 *   grid:
 *     columns: 12
 *     rows: 8
 *   physics:
 *     push_radius: 4.0
 *     enable_parallel: true
 *   camera:
 *     position: [0.0, 0.0, 15.0]
 *   template: models/teapot.glb
 */

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::camera::Camera;
use crate::params::{GridConfig, SimulationParams};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to open config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

// Top-level scene description
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub grid: GridConfig,
    pub physics: SimulationParams,
    pub camera: Camera,
    // Model file used instead of the default boxes
    pub template: Option<PathBuf>,
}

impl SceneConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let config: SceneConfig = serde_yaml::from_reader(BufReader::new(file))
            .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(source)
            .map_err(|source| ConfigError::Yaml { path: PathBuf::from("<inline>"), source })?;
        config.validate()?;
        Ok(config)
    }

    // Reject values that would make the simulation diverge or divide by zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let physics = &self.physics;
        if !(0.0..1.0).contains(&physics.damping) {
            return Err(ConfigError::Invalid(format!("damping must be in [0, 1), got {}", physics.damping)));
        }
        if physics.push_radius <= 0.0 || physics.collision_radius <= 0.0 {
            return Err(ConfigError::Invalid("push_radius and collision_radius must be positive".into()));
        }
        if physics.max_speed <= 0.0 {
            return Err(ConfigError::Invalid("max_speed must be positive".into()));
        }
        if self.grid.spacing <= 0.0 {
            return Err(ConfigError::Invalid("grid spacing must be positive".into()));
        }
        if self.camera.near <= 0.0 || self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid("camera needs 0 < near < far".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let config = SceneConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = SceneConfig::from_yaml_str(
            "grid:\n  columns: 5\nphysics:\n  push_radius: 4.0\ncamera:\n  position: [0.0, 1.0, 20.0]\ntemplate: model.obj\n",
        )
        .unwrap();
        assert_eq!(config.grid.columns, 5);
        assert_eq!(config.grid.rows, 14);
        assert_eq!(config.physics.push_radius, 4.0);
        assert_eq!(config.physics.damping, 0.93);
        assert_eq!(config.camera.position.z, 20.0);
        assert_eq!(config.template, Some(PathBuf::from("model.obj")));
    }

    #[test]
    fn bundled_scene_parses() {
        let config = SceneConfig::from_yaml_str(include_str!("../scenarios/default.yaml")).unwrap();
        assert_eq!(config.grid.len(), 280);
        assert_eq!(config.grid.palette[1], 0xff00ff);
        assert!(config.physics.enable_spatial_grid);
        assert_eq!(config.template, None);
    }

    #[test]
    fn unstable_damping_is_rejected() {
        let err = SceneConfig::from_yaml_str("physics:\n  damping: 1.2\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = SceneConfig::from_yaml_str("grid: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SceneConfig::from_path(Path::new("does/not/exist.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
