//! Accelerometers on an I2C bus.

use super::AccelBackend;
use crate::config::Mpu6500Config;
use crate::error::SensorError;

pub mod mpu6500;

/// Open the configured MPU-6500 on its Linux I2C character device.
#[cfg(target_os = "linux")]
pub fn open_mpu6500(config: &Mpu6500Config) -> Result<Box<dyn AccelBackend>, SensorError> {
    let i2c = linux_embedded_hal::I2cdev::new(&config.bus).map_err(|e| {
        SensorError::InitializationError(format!("failed to open {}: {}", config.bus, e))
    })?;
    let address = u8::try_from(config.address).map_err(|_| {
        SensorError::InitializationError(format!("invalid I2C address 0x{:X}", config.address))
    })?;

    let sensor = mpu6500::Mpu6500::new(i2c, address, config.accel_range)?;
    Ok(Box::new(sensor))
}

#[cfg(not(target_os = "linux"))]
pub fn open_mpu6500(config: &Mpu6500Config) -> Result<Box<dyn AccelBackend>, SensorError> {
    Err(SensorError::InitializationError(format!(
        "I2C bus {} is only supported on Linux",
        config.bus
    )))
}
