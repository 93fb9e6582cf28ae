//! Synthetic accelerometer for machines without motion hardware.

use super::AccelBackend;
use crate::error::SensorError;

const GRAVITY: f32 = 9.80665;
const SWAY_AMPLITUDE: f32 = 3.0;
const PHASE_STEP: f32 = 0.15;

/// Device lying flat and rocking slowly: gravity on Z, sway on X and Y.
/// Deterministic, so the same sequence is produced on every run.
pub struct SimulatedAccelerometer {
    step: u32,
}

impl SimulatedAccelerometer {
    pub fn new() -> Self {
        Self { step: 0 }
    }
}

impl Default for SimulatedAccelerometer {
    fn default() -> Self {
        Self::new()
    }
}

impl AccelBackend for SimulatedAccelerometer {
    fn describe(&self) -> String {
        "Simulated accelerometer".to_string()
    }

    fn read(&mut self) -> Result<[f32; 3], SensorError> {
        let phase = self.step as f32 * PHASE_STEP;
        self.step = self.step.wrapping_add(1);

        let x = SWAY_AMPLITUDE * phase.sin();
        let y = SWAY_AMPLITUDE * (phase * 0.5).cos() - SWAY_AMPLITUDE;
        let z = (GRAVITY * GRAVITY - x * x).max(0.0).sqrt();
        Ok([x, y, z])
    }
}
