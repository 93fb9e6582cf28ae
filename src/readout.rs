//! Live accelerometer readout.
//!
//! [`ReadoutStream`] bridges a push-based sensor notification source to a display
//! sink. It subscribes while the display is visible, truncates each axis of every
//! accelerometer notification toward zero and hands the result to the sink. There
//! is no filtering, smoothing or buffering: the sink always sees the latest reading.
//!
//! Delivery is single-threaded. The host calls [`ReadoutStream::pump`] (or
//! [`ReadoutStream::on_sample`] directly) from the same loop that owns the display.

use crate::error::SensorError;
use chrono::{DateTime, Utc};
use std::fmt;

/// Kinds of motion sensor a provider may expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Accelerometer,
    Gyroscope,
    MagneticField,
}

/// A sensor as reported by its provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorInfo {
    pub kind: SensorKind,
    pub name: String,
}

/// Requested notification cadence. Only the host's "normal" rate is ever asked for;
/// the host decides what period that means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingRate {
    Normal,
}

/// One raw notification from a provider
#[derive(Debug, Clone, PartialEq)]
pub struct SensorEvent {
    pub sensor: SensorKind,
    pub values: [f32; 3],
    pub timestamp: DateTime<Utc>,
}

impl SensorEvent {
    pub fn new(sensor: SensorKind, values: [f32; 3]) -> Self {
        Self {
            sensor,
            values,
            timestamp: Utc::now(),
        }
    }
}

/// Integer 3-axis reading handed to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl SensorSample {
    /// Truncate raw axis values; `None` if any axis is not a finite number.
    pub fn from_raw(values: [f32; 3]) -> Option<Self> {
        Some(Self {
            x: truncate(values[0])?,
            y: truncate(values[1])?,
            z: truncate(values[2])?,
        })
    }
}

impl fmt::Display for SensorSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {} | Y: {} | Z: {}", self.x, self.y, self.z)
    }
}

/// Truncate toward zero. Out-of-range values saturate at the `i32` bounds.
pub fn truncate(value: f32) -> Option<i32> {
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc() as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    #[default]
    Inactive,
    Active,
}

/// Host service that owns the sensor hardware.
#[cfg_attr(test, mockall::automock)]
pub trait SensorProvider {
    /// Default sensor of the given kind, `None` when the device has none
    fn default_sensor(&mut self, kind: SensorKind) -> Option<SensorInfo>;

    /// Start producing notifications for `sensor`
    fn register_listener(
        &mut self,
        sensor: &SensorInfo,
        rate: SamplingRate,
    ) -> Result<(), SensorError>;

    /// Stop producing notifications; nothing registered before is delivered afterwards
    fn unregister_listener(&mut self);

    /// Notifications produced since the last call
    fn take_events(&mut self) -> Vec<SensorEvent>;
}

/// Consumer that presents the latest reading. Must return immediately.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySink {
    fn render(&mut self, x: i32, y: i32, z: i32);
}

/// Two-state subscription between an accelerometer and a display sink
pub struct ReadoutStream<P: SensorProvider, S: DisplaySink> {
    provider: P,
    sink: S,
    sensor: Option<SensorInfo>,
    state: SubscriptionState,
}

impl<P: SensorProvider, S: DisplaySink> ReadoutStream<P, S> {
    /// Create an inactive stream. The provider is asked for an accelerometer exactly
    /// once; without one every later `activate` is a no-op.
    pub fn new(mut provider: P, sink: S) -> Self {
        let sensor = provider.default_sensor(SensorKind::Accelerometer);
        match &sensor {
            Some(info) => tracing::info!(sensor = %info.name, "accelerometer found"),
            None => tracing::info!("no accelerometer present, readout will show no data"),
        }

        Self {
            provider,
            sink,
            sensor,
            state: SubscriptionState::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == SubscriptionState::Active
    }

    /// The accelerometer picked at construction
    pub fn sensor(&self) -> Option<&SensorInfo> {
        self.sensor.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Subscribe at the normal sampling rate.
    ///
    /// Calling this while already active does not create a second subscription.
    /// A failed registration leaves the stream inactive, which the display shows as
    /// no data.
    pub fn activate(&mut self) {
        if self.state == SubscriptionState::Active {
            tracing::debug!("readout already active");
            return;
        }

        let Some(sensor) = &self.sensor else {
            tracing::debug!("activation ignored, no accelerometer");
            return;
        };

        match self
            .provider
            .register_listener(sensor, SamplingRate::Normal)
        {
            Ok(()) => {
                self.state = SubscriptionState::Active;
                tracing::info!(sensor = %sensor.name, "readout activated");
            }
            Err(e) => {
                tracing::warn!(sensor = %sensor.name, error = %e, "could not subscribe to accelerometer");
            }
        }
    }

    /// Unsubscribe. No sample is rendered after this returns.
    pub fn deactivate(&mut self) {
        if self.state == SubscriptionState::Inactive {
            return;
        }
        self.provider.unregister_listener();
        self.state = SubscriptionState::Inactive;
        tracing::info!("readout deactivated");
    }

    /// Handle one notification: render it if active and well-formed, drop it otherwise.
    ///
    /// Returns whether the sample reached the sink.
    pub fn on_sample(&mut self, event: &SensorEvent) -> bool {
        if self.state != SubscriptionState::Active {
            tracing::trace!("sample dropped, readout inactive");
            return false;
        }

        // Only accelerometer readings are shown; other sensor types would hook in here.
        if event.sensor != SensorKind::Accelerometer {
            tracing::trace!(sensor = ?event.sensor, "sample dropped, not an accelerometer");
            return false;
        }

        let Some(sample) = SensorSample::from_raw(event.values) else {
            tracing::trace!(values = ?event.values, "sample dropped, non-finite value");
            return false;
        };

        tracing::trace!(%sample, at = %event.timestamp, "sample rendered");
        self.sink.render(sample.x, sample.y, sample.z);
        true
    }

    /// Drain the provider's pending notifications through [`Self::on_sample`].
    ///
    /// Returns how many samples reached the sink. Notifications drained while
    /// inactive are discarded.
    pub fn pump(&mut self) -> usize {
        let events = self.provider.take_events();
        events.iter().filter(|event| self.on_sample(event)).count()
    }
}

impl<P: SensorProvider, S: DisplaySink> Drop for ReadoutStream<P, S> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
