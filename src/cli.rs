/*
 * Command Line Module
 *
 * Arguments for the interactive demo. Values given here override the scene
 * configuration file.
 */

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, SceneConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "hoverfield", version, about = "Floating object grid that repels from a tracked pointer")]
pub struct Args {
    /// Scene configuration (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Model file to use instead of the default boxes
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Lattice columns
    #[arg(long)]
    pub columns: Option<usize>,

    /// Lattice rows
    #[arg(long)]
    pub rows: Option<usize>,

    /// Read pointer samples ("x y" or "none" per line) from stdin
    #[arg(long)]
    pub pointer_stdin: bool,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

impl Args {
    // Config file (or defaults) with the command-line overrides applied
    pub fn scene(&self) -> Result<SceneConfig, ConfigError> {
        let mut scene = match &self.config {
            Some(path) => SceneConfig::from_path(path)?,
            None => SceneConfig::default(),
        };
        if let Some(columns) = self.columns {
            scene.grid.columns = columns;
        }
        if let Some(rows) = self.rows {
            scene.grid.rows = rows;
        }
        if self.model.is_some() {
            scene.template = self.model.clone();
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let args = Args::parse_from(["hoverfield", "--columns", "6", "--rows", "4", "--model", "cube.obj"]);
        let scene = args.scene().unwrap();
        assert_eq!(scene.grid.columns, 6);
        assert_eq!(scene.grid.rows, 4);
        assert_eq!(scene.template, Some(PathBuf::from("cube.obj")));
        assert!(!args.pointer_stdin);
    }

    #[test]
    fn log_level_defaults_to_info() {
        let args = Args::parse_from(["hoverfield"]);
        assert_eq!(args.log_level, tracing::Level::INFO);

        let args = Args::parse_from(["hoverfield", "--log-level", "DEBUG"]);
        assert_eq!(args.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        assert!(Args::try_parse_from(["hoverfield", "--log-level", "loud"]).is_err());
    }
}
