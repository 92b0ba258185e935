//! Headless driver for the Cinder kinematics core.
//!
//! Loads `config.ron`, applies CLI overrides, installs logging and runs the
//! scripted demo scene for the requested number of ticks.

mod demo;

use std::process::ExitCode;

use cinder_config::{CliArgs, Config, default_config_dir};
use clap::Parser;
use tracing::{error, info};

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Logging is not up yet, so a bad config file is reported on stderr.
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Failed to load config from {}: {e}; using defaults",
                config_dir.display()
            );
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    cinder_log::init_logging(Some(log_dir.as_path()), cfg!(debug_assertions), Some(&config));
    info!(
        config_dir = %config_dir.display(),
        ticks = args.ticks,
        allow_nether = config.simulation.allow_nether,
        "Cinder simulator starting"
    );

    let mut scene = demo::Scene::build(config.simulation);
    match scene.run(args.ticks) {
        Ok(stats) => {
            scene.log_state();
            info!(
                ticks = stats.ticks,
                sounds = stats.sounds,
                particles = stats.particles,
                "Simulation finished"
            );
            ExitCode::SUCCESS
        }
        Err(fault) => {
            error!("{fault}\n{}", fault.report());
            ExitCode::FAILURE
        }
    }
}
