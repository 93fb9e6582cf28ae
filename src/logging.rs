//! Tracing subscriber setup.

use crate::config::{LoggingConfig, RunMode};
use crate::error::Result;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. With no log file the
/// interactive mode installs a discarding writer, since the terminal belongs to the UI.
pub fn init_logging(config: &LoggingConfig, mode: RunMode) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (writer, ansi) = match (&config.file, mode) {
        (Some(path), _) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        (None, RunMode::Interactive) => (BoxMakeWriter::new(std::io::sink), false),
        (None, RunMode::Headless) => (BoxMakeWriter::new(std::io::stderr), config.colored),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))?;
    Ok(())
}
