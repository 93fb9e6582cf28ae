//! Custom error types for the sensor-panel application.
//!
//! This module defines domain-specific error types using thiserror,
//! providing clear error messages and proper error context propagation.

use thiserror::Error;

/// Errors related to sensor backends
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("I2C communication failed: {0}")]
    I2cError(String),

    #[error("Sensor initialization failed: {0}")]
    InitializationError(String),

    #[error("Sensor read failed: {0}")]
    ReadError(String),

    #[error("Malformed value in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("No listener slot for {0}")]
    RegistrationError(String),
}

/// Errors related to application configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Failed to serialize config: {0}")]
    SerializeError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by host capabilities (haptics, connectivity probing, map launching)
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Haptic pulse failed: {0}")]
    HapticsError(String),

    #[error("Connectivity probe failed: {0}")]
    ProbeError(String),

    #[error("Could not open map with {opener}: {message}")]
    LaunchError { opener: String, message: String },
}

/// Errors related to the UI
#[derive(Debug, Error)]
pub enum UiError {
    #[error("Terminal initialization failed: {0}")]
    InitializationError(String),

    #[error("Terminal rendering failed: {0}")]
    RenderError(String),

    #[error("Input handling failed: {0}")]
    InputError(String),
}

/// Errors related to service/daemon operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Signal handling error: {0}")]
    SignalError(String),
}

/// Application-level errors that can wrap other error types
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Sensor error: {0}")]
    Sensor(#[from] SensorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("UI error: {0}")]
    Ui(#[from] UiError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
