//! Configuration system for Cinder.
//!
//! Simulation constants and debug settings persist to disk as a RON file.
//! CLI arguments override loaded values; unknown or missing fields fall back
//! to defaults so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, SimulationConfig, default_config_dir};
pub use error::ConfigError;
