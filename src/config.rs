//! Application configuration management.
//!
//! This module handles loading, parsing, and validating the application configuration
//! from a TOML file and `SENSOR_PANEL__*` environment variables, with support for
//! runtime overrides from CLI arguments.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Config file looked up when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "sensor-panel.toml";

/// Prefix for environment overrides, e.g. `SENSOR_PANEL__SERVICE__TICK_MS=100`
const ENV_PREFIX: &str = "SENSOR_PANEL";

const SUPPORTED_ACCEL_RANGES: [u16; 4] = [2, 4, 8, 16];
const MAX_PULSE_MS: u64 = 10_000;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub logging: LoggingConfig,
    pub sensor: SensorConfig,
    pub haptics: HapticsConfig,
    pub connectivity: ConnectivityConfig,
    pub map: MapConfig,
}

/// How the application presents the readout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Terminal UI with the readout panel and dialogs
    Interactive,
    /// No UI, samples are logged
    Headless,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interactive" => Ok(RunMode::Interactive),
            "headless" | "daemon" => Ok(RunMode::Headless),
            other => Err(format!("unknown run mode '{}'", other)),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Interactive => write!(f, "interactive"),
            RunMode::Headless => write!(f, "headless"),
        }
    }
}

/// Where accelerometer readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorSource {
    /// Linux Industrial I/O sysfs device
    Iio,
    /// MPU-6500 on an I2C bus
    Mpu6500,
    /// Synthetic readings
    Simulated,
    /// Behave like a device without an accelerometer
    None,
}

impl FromStr for SensorSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "iio" => Ok(SensorSource::Iio),
            "mpu6500" => Ok(SensorSource::Mpu6500),
            "simulated" | "sim" => Ok(SensorSource::Simulated),
            "none" => Ok(SensorSource::None),
            other => Err(format!("unknown sensor source '{}'", other)),
        }
    }
}

/// Service runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub run_mode: RunMode,
    /// Event loop tick; sensor notifications and redraws happen on this cadence
    pub tick_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub json: bool,
    pub colored: bool,
}

/// Accelerometer source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub source: SensorSource,
    /// Period the host uses for the "normal" sampling rate
    pub normal_period_ms: u64,
    pub iio_root: PathBuf,
    pub mpu6500: Mpu6500Config,
}

/// MPU-6500 wiring and range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Mpu6500Config {
    pub bus: String,
    pub address: u16,
    pub accel_range: u16,
}

/// Haptic pulse configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub pulse_ms: u64,
    /// Ring the terminal bell on each pulse
    pub bell: bool,
}

/// Connectivity probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub sysfs_root: PathBuf,
    /// GPS receiver device node; GPS counts as on while it exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_device: Option<PathBuf>,
    /// File holding the last GPS fix as `lat,lon`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_fix_file: Option<PathBuf>,
    /// Coarse location used when there is no GPS fix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_location: Option<LocationConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Map jump configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Map application tried first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_opener: Option<String>,
    /// Generic opener used when the preferred one is missing or fails
    pub fallback_opener: String,
    pub label: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            run_mode: RunMode::Interactive,
            tick_ms: 50,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json: false,
            colored: true,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            source: SensorSource::Iio,
            normal_period_ms: 200,
            iio_root: PathBuf::from("/sys/bus/iio/devices"),
            mpu6500: Mpu6500Config::default(),
        }
    }
}

impl Default for Mpu6500Config {
    fn default() -> Self {
        Self {
            bus: "/dev/i2c-1".to_string(),
            address: 0x68,
            accel_range: 2,
        }
    }
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            pulse_ms: 500,
            bell: true,
        }
    }
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from("/sys"),
            gps_device: None,
            gps_fix_file: None,
            network_location: None,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            preferred_opener: None,
            fallback_opener: "xdg-open".to_string(),
            label: "My Location".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file layered under environment overrides.
    ///
    /// A missing file is only an error when `required` is set.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path.as_ref())
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(ConfigError::LoadError)?;

        let config: AppConfig = settings
            .try_deserialize()
            .map_err(ConfigError::LoadError)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.service.tick_ms == 0 {
            return Err(invalid("service.tick_ms", "must be greater than 0"));
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(invalid(
                "logging.level",
                "must be one of trace, debug, info, warn, error",
            ));
        }

        if self.sensor.normal_period_ms == 0 {
            return Err(invalid("sensor.normal_period_ms", "must be greater than 0"));
        }

        if !SUPPORTED_ACCEL_RANGES.contains(&self.sensor.mpu6500.accel_range) {
            return Err(invalid("sensor.mpu6500.accel_range", "must be 2, 4, 8, or 16"));
        }

        if self.sensor.mpu6500.address > 0x7F {
            return Err(invalid("sensor.mpu6500.address", "must be a 7-bit I2C address"));
        }

        if self.haptics.pulse_ms == 0 || self.haptics.pulse_ms > MAX_PULSE_MS {
            return Err(invalid("haptics.pulse_ms", "must be between 1 and 10000"));
        }

        if let Some(location) = &self.connectivity.network_location {
            if !(-90.0..=90.0).contains(&location.latitude) {
                return Err(invalid(
                    "connectivity.network_location.latitude",
                    "must be within -90..=90",
                ));
            }
            if !(-180.0..=180.0).contains(&location.longitude) {
                return Err(invalid(
                    "connectivity.network_location.longitude",
                    "must be within -180..=180",
                ));
            }
        }

        if self.map.fallback_opener.trim().is_empty() {
            return Err(invalid("map.fallback_opener", "cannot be empty"));
        }

        Ok(())
    }

    /// Apply CLI argument overrides to configuration
    pub fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(mode) = cli.mode {
            self.service.run_mode = mode;
        }

        if let Some(tick) = cli.tick_ms {
            self.service.tick_ms = tick;
        }

        if let Some(level) = cli.log_level {
            self.logging.level = level.to_filter_string().to_string();
        }

        if let Some(source) = cli.sensor {
            self.sensor.source = source;
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()).into())
    }
}

fn invalid(field: &str, message: &str) -> crate::error::AppError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.service.run_mode, RunMode::Interactive);
        assert_eq!(config.sensor.source, SensorSource::Iio);
        assert_eq!(config.sensor.normal_period_ms, 200);
        assert_eq!(config.haptics.pulse_ms, 500);
        assert_eq!(config.map.fallback_opener, "xdg-open");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_tick() {
        let mut config = AppConfig::default();
        config.service.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accel_range() {
        let mut config = AppConfig::default();
        config.sensor.mpu6500.accel_range = 3;
        assert!(config.validate().is_err());
        config.sensor.mpu6500.accel_range = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_pulse_bounds() {
        let mut config = AppConfig::default();
        config.haptics.pulse_ms = 0;
        assert!(config.validate().is_err());
        config.haptics.pulse_ms = MAX_PULSE_MS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_network_location_range() {
        let mut config = AppConfig::default();
        config.connectivity.network_location = Some(LocationConfig {
            latitude: 91.0,
            longitude: 0.0,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_fallback_opener() {
        let mut config = AppConfig::default();
        config.map.fallback_opener = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
run_mode = "headless"

[sensor]
source = "simulated"

[sensor.mpu6500]
address = 0x69

[connectivity.network_location]
latitude = 56.95
longitude = 24.1
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path(), true).unwrap();
        assert_eq!(config.service.run_mode, RunMode::Headless);
        assert_eq!(config.service.tick_ms, 50);
        assert_eq!(config.sensor.source, SensorSource::Simulated);
        assert_eq!(config.sensor.mpu6500.address, 0x69);
        assert_eq!(config.sensor.mpu6500.bus, "/dev/i2c-1");
        assert_eq!(
            config.connectivity.network_location,
            Some(LocationConfig {
                latitude: 56.95,
                longitude: 24.1
            })
        );
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[haptics]\npulse_ms = 0").unwrap();
        assert!(AppConfig::load(file.path(), true).is_err());
    }

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(config.haptics.pulse_ms, 500);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(dir.path().join("absent.toml"), true).is_err());
    }

    #[test]
    fn test_to_toml_round_trips_through_loader() {
        let mut config = AppConfig::default();
        config.sensor.source = SensorSource::None;
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("source = \"none\""));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effective.toml");
        std::fs::write(&path, rendered).unwrap();
        let loaded = AppConfig::load(&path, true).unwrap();
        assert_eq!(loaded.sensor.source, SensorSource::None);
    }

    #[test]
    fn test_mode_and_source_parsing() {
        assert_eq!("Headless".parse::<RunMode>(), Ok(RunMode::Headless));
        assert_eq!("daemon".parse::<RunMode>(), Ok(RunMode::Headless));
        assert_eq!("sim".parse::<SensorSource>(), Ok(SensorSource::Simulated));
        assert!("gyro".parse::<SensorSource>().is_err());
    }
}
