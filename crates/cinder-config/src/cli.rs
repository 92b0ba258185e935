//! Command-line argument parsing for the Cinder simulator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

const DEFAULT_TICKS: u32 = 200;

/// Cinder command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "cinder", about = "Headless entity kinematics simulator")]
pub struct CliArgs {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of world ticks to simulate.
    #[arg(long, default_value_t = DEFAULT_TICKS)]
    pub ticks: u32,

    /// Allow portal travel between dimensions.
    #[arg(long)]
    pub allow_nether: Option<bool>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            log_level: None,
            ticks: DEFAULT_TICKS,
            allow_nether: None,
            config: None,
        }
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(allow) = args.allow_nether {
            self.simulation.allow_nether = allow;
        }
    }
}
