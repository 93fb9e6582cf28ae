//! Application state management for the TUI.
//!
//! This module manages the screen state (visibility, dialog, help, status line) and
//! turns user actions into calls on the readout stream and the host capabilities.

use crate::platform::{geo_uri, Capabilities, ConnectivityReport};
use crate::readout::{DisplaySink, ReadoutStream, SensorProvider, SensorSample};
use crate::ui::input::InputAction;
use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Display sink backing the readout panel: keeps only the latest reading
#[derive(Debug, Default)]
pub struct ReadoutPanel {
    latest: Option<SensorSample>,
    updated_at: Option<DateTime<Local>>,
    samples_seen: u64,
}

impl ReadoutPanel {
    pub fn latest(&self) -> Option<SensorSample> {
        self.latest
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Text shown in the panel
    pub fn text(&self) -> String {
        match self.latest {
            Some(sample) => sample.to_string(),
            None => "No data".to_string(),
        }
    }
}

impl DisplaySink for ReadoutPanel {
    fn render(&mut self, x: i32, y: i32, z: i32) {
        self.latest = Some(SensorSample { x, y, z });
        self.updated_at = Some(Local::now());
        self.samples_seen += 1;
    }
}

/// Application state
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,
    /// Whether the screen is currently visible (terminal focused)
    pub visible: bool,
    /// Accelerometer description, `None` when the device has none
    pub sensor_name: Option<String>,
    /// Status message
    pub status_message: Option<String>,
    /// Error message
    pub error_message: Option<String>,
    /// Show help panel
    pub show_help: bool,
    /// Open connectivity dialog
    pub dialog: Option<ConnectivityReport>,
    /// End of the current haptic pulse
    pub pulse_until: Option<Instant>,
    capabilities: Capabilities,
    pulse: Duration,
    map_label: String,
}

impl App {
    /// Create a new application state
    pub fn new(
        sensor_name: Option<String>,
        capabilities: Capabilities,
        pulse: Duration,
        map_label: String,
    ) -> Self {
        let status_message = match &sensor_name {
            Some(_) => "Application started".to_string(),
            None => "No accelerometer on this device".to_string(),
        };

        Self {
            should_quit: false,
            visible: false,
            sensor_name,
            status_message: Some(status_message),
            error_message: None,
            show_help: false,
            dialog: None,
            pulse_until: None,
            capabilities,
            pulse,
            map_label,
        }
    }

    /// Apply one user or lifecycle action
    pub async fn handle<P: SensorProvider>(
        &mut self,
        action: InputAction,
        stream: &mut ReadoutStream<P, ReadoutPanel>,
    ) {
        match action {
            InputAction::Quit => self.should_quit = true,
            InputAction::Shown => self.show(stream),
            InputAction::Hidden => self.hide(stream),
            InputAction::Vibrate => self.vibrate(),
            InputAction::CheckConnectivity => self.check_connectivity().await,
            InputAction::DismissDialog => self.dialog = None,
            InputAction::OpenMap => self.open_map().await,
            InputAction::ToggleHelp => self.show_help = !self.show_help,
            InputAction::None => {}
        }
    }

    /// Screen became visible: subscribe
    pub fn show<P: SensorProvider>(&mut self, stream: &mut ReadoutStream<P, ReadoutPanel>) {
        if self.visible {
            return;
        }
        self.visible = true;
        stream.activate();
    }

    /// Screen became hidden: unsubscribe
    pub fn hide<P: SensorProvider>(&mut self, stream: &mut ReadoutStream<P, ReadoutPanel>) {
        if !self.visible {
            return;
        }
        self.visible = false;
        stream.deactivate();
    }

    /// Periodic housekeeping
    pub fn tick(&mut self) {
        if let Some(until) = self.pulse_until {
            if Instant::now() >= until {
                self.pulse_until = None;
            }
        }
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse_until.is_some()
    }

    fn vibrate(&mut self) {
        match self.capabilities.haptics.pulse(self.pulse) {
            Ok(()) => {
                self.pulse_until = Some(Instant::now() + self.pulse);
                self.clear_error();
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    async fn check_connectivity(&mut self) {
        let report = ConnectivityReport::gather(self.capabilities.probe.as_ref()).await;
        self.dialog = Some(report);
        self.show_help = false;
    }

    async fn open_map(&mut self) {
        let Some(location) = self.dialog.as_ref().and_then(|report| report.location()) else {
            return;
        };

        let uri = geo_uri(location, &self.map_label);
        match self.capabilities.launcher.open(&uri).await {
            Ok(()) => {
                self.dialog = None;
                self.set_status("Map opened".to_string());
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Set error message
    pub fn set_error(&mut self, message: String) {
        tracing::warn!(%message, "ui error");
        self.error_message = Some(message);
    }

    /// Clear error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }
}
