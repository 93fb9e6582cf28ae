//! Command-line interface argument parsing.
//!
//! This module defines the CLI structure and parsing logic using gumdrop.
//! Every option is optional so that unset flags leave the config file value alone.

use crate::config::{RunMode, SensorSource};
use gumdrop::Options;
use std::path::PathBuf;
use std::str::FromStr;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Show all messages including trace
    Trace,
    /// Show debug messages and above
    Debug,
    /// Show info messages and above
    Info,
    /// Show warnings and errors only
    Warn,
    /// Show errors only
    Error,
}

impl LogLevel {
    /// Convert LogLevel to a tracing filter directive
    pub fn to_filter_string(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// sensor-panel: live accelerometer readout with haptics and a connectivity report
#[derive(Debug, Options)]
pub struct Cli {
    #[options(help_flag, help = "print this help message")]
    pub help: bool,

    #[options(no_short, help = "print version and exit")]
    pub version: bool,

    #[options(help = "run mode: interactive or headless", meta = "MODE")]
    pub mode: Option<RunMode>,

    #[options(help = "path to configuration file (default: sensor-panel.toml)", meta = "PATH")]
    pub config: Option<PathBuf>,

    #[options(help = "log level: trace, debug, info, warn, error", meta = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[options(help = "accelerometer source: iio, mpu6500, simulated, none", meta = "SOURCE")]
    pub sensor: Option<SensorSource>,

    #[options(no_short, help = "event loop tick in milliseconds", meta = "MS")]
    pub tick_ms: Option<u64>,

    #[options(no_short, help = "print the effective configuration as TOML and exit")]
    pub print_config: bool,
}

impl Cli {
    /// Parse command-line arguments, exiting with usage on error or `--help`
    pub fn parse_args() -> Self {
        Self::parse_args_default_or_exit()
    }
}
