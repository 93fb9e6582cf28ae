//! sensor-panel: live accelerometer readout with a haptic pulse and a connectivity report.
//!
//! Startup order:
//! 1. Parse the command line and load the TOML configuration (environment overrides on top).
//! 2. Decide the run mode; interactive falls back to headless without a terminal.
//! 3. Install tracing, open the accelerometer backend and the host capabilities.
//! 4. Run the terminal UI or the headless service until quit or a shutdown signal.

mod cli;
mod config;
mod error;
mod logging;
mod platform;
mod readout;
mod sensors;
mod service;
mod ui;

use anyhow::Result;
use cli::Cli;
use config::{AppConfig, RunMode, DEFAULT_CONFIG_PATH};
use platform::Capabilities;
use sensors::HostSensorManager;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    if cli.version {
        println!("sensor-panel {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path, true)?,
        None => AppConfig::load(DEFAULT_CONFIG_PATH, false)?,
    };
    config.apply_cli_overrides(&cli);
    config.validate()?;

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let requested = config.service.run_mode;
    let mode = match requested {
        RunMode::Interactive if !atty::is(atty::Stream::Stdout) => RunMode::Headless,
        other => other,
    };

    logging::init_logging(&config.logging, mode)?;
    if mode != requested {
        tracing::warn!("stdout is not a terminal, running headless");
    }
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        ?mode,
        sensor = ?config.sensor.source,
        "sensor-panel starting"
    );

    let provider = HostSensorManager::from_config(&config.sensor);
    let capabilities = Capabilities::from_config(&config, mode);

    let shutdown = CancellationToken::new();
    let signal_task = service::shutdown_on_signals(shutdown.clone())?;

    let result = match mode {
        RunMode::Interactive => {
            ui::run_interactive(&config, provider, capabilities, shutdown.clone()).await
        }
        RunMode::Headless => {
            service::run_headless(&config, provider, capabilities, shutdown.clone()).await
        }
    };

    shutdown.cancel();
    signal_task.abort();

    if let Err(e) = &result {
        tracing::error!(error = %e, "sensor-panel stopped with an error");
    } else {
        tracing::info!("sensor-panel stopped");
    }
    result.map_err(Into::into)
}
