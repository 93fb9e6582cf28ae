//! Host-side accelerometer provider.
//!
//! [`HostSensorManager`] plays the role of the platform sensor service: it owns one
//! accelerometer backend, reports whether the device has one, and produces at most
//! one notification per sampling period while a listener is registered.

use crate::config::{SensorConfig, SensorSource};
use crate::error::SensorError;
use crate::readout::{SamplingRate, SensorEvent, SensorInfo, SensorKind, SensorProvider};
use std::time::{Duration, Instant};

pub mod i2c;
pub mod iio;
pub mod simulated;

/// A readable accelerometer. Values are in m/s².
pub trait AccelBackend {
    fn describe(&self) -> String;
    fn read(&mut self) -> Result<[f32; 3], SensorError>;

    /// Other motion channels on the same device. The host queues them on the same
    /// listener as the accelerometer, so consumers see every kind.
    fn read_companions(&mut self) -> Result<Vec<(SensorKind, [f32; 3])>, SensorError> {
        Ok(Vec::new())
    }
}

struct Listener {
    period: Duration,
    last_read: Option<Instant>,
}

pub struct HostSensorManager {
    backend: Option<Box<dyn AccelBackend>>,
    normal_period: Duration,
    listener: Option<Listener>,
}

impl HostSensorManager {
    pub fn new(backend: Option<Box<dyn AccelBackend>>, normal_period: Duration) -> Self {
        Self {
            backend,
            normal_period,
            listener: None,
        }
    }

    /// Open the configured backend. Any failure means "no accelerometer".
    pub fn from_config(config: &SensorConfig) -> Self {
        let backend = open_backend(config);
        Self::new(backend, Duration::from_millis(config.normal_period_ms))
    }

    fn period_for(&self, rate: SamplingRate) -> Duration {
        match rate {
            SamplingRate::Normal => self.normal_period,
        }
    }
}

impl SensorProvider for HostSensorManager {
    fn default_sensor(&mut self, kind: SensorKind) -> Option<SensorInfo> {
        if kind != SensorKind::Accelerometer {
            return None;
        }
        self.backend.as_ref().map(|backend| SensorInfo {
            kind,
            name: backend.describe(),
        })
    }

    fn register_listener(
        &mut self,
        sensor: &SensorInfo,
        rate: SamplingRate,
    ) -> Result<(), SensorError> {
        if sensor.kind != SensorKind::Accelerometer || self.backend.is_none() {
            return Err(SensorError::RegistrationError(sensor.name.clone()));
        }
        if self.listener.is_some() {
            tracing::debug!(sensor = %sensor.name, "replacing existing listener");
        }

        let period = self.period_for(rate);
        tracing::debug!(sensor = %sensor.name, period_ms = period.as_millis() as u64, "listener registered");
        self.listener = Some(Listener {
            period,
            last_read: None,
        });
        Ok(())
    }

    fn unregister_listener(&mut self) {
        if self.listener.take().is_some() {
            tracing::debug!("listener unregistered");
        }
    }

    fn take_events(&mut self) -> Vec<SensorEvent> {
        let (Some(listener), Some(backend)) = (self.listener.as_mut(), self.backend.as_mut())
        else {
            return Vec::new();
        };

        let now = Instant::now();
        if let Some(last) = listener.last_read {
            if now.duration_since(last) < listener.period {
                return Vec::new();
            }
        }
        listener.last_read = Some(now);

        let mut events = match backend.read() {
            Ok(values) => vec![SensorEvent::new(SensorKind::Accelerometer, values)],
            Err(e) => {
                tracing::warn!(error = %e, "accelerometer read failed");
                return Vec::new();
            }
        };

        match backend.read_companions() {
            Ok(readings) => events.extend(
                readings
                    .into_iter()
                    .map(|(kind, values)| SensorEvent::new(kind, values)),
            ),
            Err(e) => tracing::debug!(error = %e, "companion channel read failed"),
        }
        events
    }
}

fn open_backend(config: &SensorConfig) -> Option<Box<dyn AccelBackend>> {
    match config.source {
        SensorSource::Iio => match iio::IioAccelerometer::discover(&config.iio_root) {
            Ok(Some(device)) => Some(Box::new(device)),
            Ok(None) => {
                tracing::info!(root = %config.iio_root.display(), "no IIO accelerometer found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to probe IIO devices");
                None
            }
        },
        SensorSource::Mpu6500 => match i2c::open_mpu6500(&config.mpu6500) {
            Ok(device) => Some(device),
            Err(e) => {
                tracing::warn!(error = %e, bus = %config.mpu6500.bus, "MPU6500 unavailable");
                None
            }
        },
        SensorSource::Simulated => Some(Box::new(simulated::SimulatedAccelerometer::new())),
        SensorSource::None => None,
    }
}
