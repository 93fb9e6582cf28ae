//! One-shot haptic pulse.

use crate::error::PlatformError;
use std::io::{self, Write};
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
pub trait Haptics {
    /// Fire a single pulse of `duration`. Returns without waiting for it to finish.
    fn pulse(&mut self, duration: Duration) -> Result<(), PlatformError>;
}

/// Terminal stand-in for a vibration motor: rings the bell
pub struct TerminalBell<W: Write> {
    out: W,
    enabled: bool,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout(enabled: bool) -> Self {
        Self::new(io::stdout(), enabled)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        Self { out, enabled }
    }
}

impl<W: Write> Haptics for TerminalBell<W> {
    fn pulse(&mut self, duration: Duration) -> Result<(), PlatformError> {
        tracing::debug!(duration_ms = duration.as_millis() as u64, bell = self.enabled, "haptic pulse");
        if !self.enabled {
            return Ok(());
        }
        self.out
            .write_all(b"\x07")
            .and_then(|_| self.out.flush())
            .map_err(|e| PlatformError::HapticsError(e.to_string()))
    }
}

/// Headless pulse: records the request in the log
pub struct LogHaptics;

impl Haptics for LogHaptics {
    fn pulse(&mut self, duration: Duration) -> Result<(), PlatformError> {
        tracing::info!(duration_ms = duration.as_millis() as u64, "haptic pulse");
        Ok(())
    }
}
