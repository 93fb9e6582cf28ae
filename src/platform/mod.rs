//! Host capabilities the screen calls into: haptic pulse, connectivity probing and
//! map launching. Each one is a trait so the UI and the service never reach for
//! host globals directly.

pub mod connectivity;
pub mod haptics;
pub mod maps;

pub use connectivity::{ConnectivityProbe, ConnectivityReport, SysfsProbe};
pub use haptics::{Haptics, LogHaptics, TerminalBell};
pub use maps::{geo_uri, CommandLauncher, MapLauncher};

use crate::config::{AppConfig, RunMode};

/// Capability objects injected into the screen
pub struct Capabilities {
    pub haptics: Box<dyn Haptics>,
    pub probe: Box<dyn ConnectivityProbe>,
    pub launcher: Box<dyn MapLauncher>,
}

impl Capabilities {
    /// Host adapters for the given run mode
    pub fn from_config(config: &AppConfig, mode: RunMode) -> Self {
        let haptics: Box<dyn Haptics> = match mode {
            RunMode::Interactive => Box::new(TerminalBell::stdout(config.haptics.bell)),
            RunMode::Headless => Box::new(LogHaptics),
        };

        Self {
            haptics,
            probe: Box::new(SysfsProbe::from_config(&config.connectivity)),
            launcher: Box::new(CommandLauncher::from_config(&config.map)),
        }
    }
}
