//! # Grid CLI
//!
//! Command-line host for grid-core. Grids live as JSON documents in a data
//! directory and are edited by replaying the same events the browser editor
//! sends.
//!
//! ## Usage
//!
//! ```bash
//! gridctl new --width 300 --height 200
//! gridctl apply <grid-id> events.json
//! gridctl show <grid-id>
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Data directory and engine configuration
//! - `commands` - One function per subcommand, returning the text to print
//! - `map` - Text rendering of a grid's tiling

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

pub mod commands;
pub mod map;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use grid_core::{EngineConfig, GridError, NeighborRule, ResolutionStrategy};

/// Command-line arguments for gridctl.
#[derive(Debug, Clone, Parser)]
#[command(name = "gridctl")]
#[command(about = "Create, edit and inspect grid canvases")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding `<grid-id>.json` documents
    #[arg(long, env = "GRID_DATA_DIR", default_value = "grids")]
    pub data_dir: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(long, env = "GRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Placement strategy for drops, overriding the config file
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Merge neighbor rule, overriding the config file
    #[arg(long, value_enum)]
    pub neighbor_rule: Option<NeighborArg>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// gridctl subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create a new 1x1 grid and print its id
    New {
        /// Canvas width in pixels
        #[arg(long)]
        width: Option<f32>,
        /// Canvas height in pixels
        #[arg(long)]
        height: Option<f32>,
    },
    /// Replay a JSON array of editor events against a stored grid
    Apply {
        /// Grid id
        grid: String,
        /// File containing the events
        events: PathBuf,
    },
    /// Print a stored grid's document and tiling map
    Show {
        /// Grid id
        grid: String,
    },
    /// List stored grids
    List,
}

/// Placement strategy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Equal-cell index lookup
    Index,
    /// Closest measured box center
    NearestCenter,
}

impl From<StrategyArg> for ResolutionStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Index => Self::Index,
            StrategyArg::NearestCenter => Self::NearestCenter,
        }
    }
}

/// Merge neighbor rule as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NeighborArg {
    /// First candidate in store order
    First,
    /// Closest candidate along the axis
    Nearest,
}

impl From<NeighborArg> for NeighborRule {
    fn from(arg: NeighborArg) -> Self {
        match arg {
            NeighborArg::First => Self::FirstInStoreOrder,
            NeighborArg::Nearest => Self::Nearest,
        }
    }
}

/// Errors raised while assembling the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The config file is not valid JSON.
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: GridError,
    },
    /// The resolved configuration has an out-of-range value.
    #[error("Invalid engine configuration: {0}")]
    Invalid(#[source] GridError),
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding grid documents.
    pub data_dir: PathBuf,
    /// Engine configuration.
    pub engine: EngineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data_dir: PathBuf::from("grids"),
            engine: EngineConfig::default(),
        }
    }

    /// Build the configuration from arguments, reading the config file if
    /// one was given. Flags take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file can't be read or parsed, or if the
    /// resolved engine configuration is out of range.
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut engine = match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.clone(),
                    source,
                })?;
                EngineConfig::from_json(&json).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            None => EngineConfig::default(),
        };
        if let Some(strategy) = args.strategy {
            engine = engine.with_strategy(strategy.into());
        }
        if let Some(rule) = args.neighbor_rule {
            engine = engine.with_neighbor_rule(rule.into());
        }
        engine.validate().map_err(ConfigError::Invalid)?;
        Ok(Self {
            data_dir: args.data_dir.clone(),
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).expect("valid arguments")
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = parse(&[
            "gridctl",
            "--data-dir",
            "/tmp/grids",
            "--strategy",
            "nearest-center",
            "--neighbor-rule",
            "nearest",
            "list",
        ]);
        let config = CliConfig::from_args(&args).expect("config");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/grids"));
        assert_eq!(config.engine.strategy, ResolutionStrategy::NearestCenter);
        assert_eq!(config.engine.neighbor_rule, NeighborRule::Nearest);
    }

    #[test]
    fn test_config_file_is_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"default_width":640.0,"neighbor_rule":"nearest"}"#)
            .expect("write");
        let path_arg = path.to_string_lossy().to_string();
        let args = parse(&["gridctl", "--config", &path_arg, "--neighbor-rule", "first", "list"]);
        let config = CliConfig::from_args(&args).expect("config");
        assert!((config.engine.default_width - 640.0).abs() < f32::EPSILON);
        assert_eq!(config.engine.neighbor_rule, NeighborRule::FirstInStoreOrder);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = parse(&["gridctl", "--config", "/nonexistent/engine.json", "list"]);
        assert!(matches!(
            CliConfig::from_args(&args),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_out_of_range_config_file_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{"row_resize_scale":-2.0}"#).expect("write");
        let path_arg = path.to_string_lossy().to_string();
        let args = parse(&["gridctl", "--config", &path_arg, "list"]);
        assert!(matches!(
            CliConfig::from_args(&args),
            Err(ConfigError::Parse {
                source: GridError::InvalidConfig(_),
                ..
            })
        ));
    }

    #[test]
    fn test_subcommand_arguments() {
        let args = parse(&["gridctl", "new", "--width", "800"]);
        assert!(matches!(
            args.command,
            Command::New {
                width: Some(w),
                height: None
            } if (w - 800.0).abs() < f32::EPSILON
        ));
    }
}
