use crate::error::SensorError;
use crate::readout::SensorKind;
use crate::sensors::AccelBackend;
use embedded_hal::i2c::I2c;

const PWR_MGMT_1: u8 = 0x6B;
const ACCEL_CONFIG: u8 = 0x1C;
const ACCEL_XOUT_H: u8 = 0x3B;
const GYRO_XOUT_H: u8 = 0x43;

/// LSB per °/s at the power-on ±250 °/s range
const GYRO_SENSITIVITY: f32 = 131.0;

/// Standard gravity, m/s² per g
const STANDARD_GRAVITY: f32 = 9.80665;

/// InvenSense MPU-6500. The accelerometer range is configurable; the gyro stays at its
/// power-on range.
pub struct Mpu6500<I: I2c> {
    i2c: I,
    address: u8,
    accel_range: u16,
}

impl<I: I2c> Mpu6500<I> {
    /// Wake the device and program its full-scale range
    pub fn new(i2c: I, address: u8, accel_range: u16) -> Result<Self, SensorError> {
        let mut sensor = Self {
            i2c,
            address,
            accel_range,
        };
        sensor.init()?;
        Ok(sensor)
    }

    fn init(&mut self) -> Result<(), SensorError> {
        // Wake up the device
        self.write_register(PWR_MGMT_1, 0x00)
            .map_err(|e| SensorError::InitializationError(e.to_string()))?;

        let accel_config = match self.accel_range {
            16 => 0x18, // ±16g
            8 => 0x10,  // ±8g
            4 => 0x08,  // ±4g
            2 => 0x00,  // ±2g
            _ => 0x18,  // Default to ±16g
        };
        self.write_register(ACCEL_CONFIG, accel_config)
            .map_err(|e| SensorError::InitializationError(e.to_string()))?;

        tracing::info!(address = self.address, range_g = self.accel_range, "MPU6500 initialized");
        Ok(())
    }

    /// LSB per g for the configured range
    fn sensitivity(&self) -> f32 {
        match self.accel_range {
            16 => 2048.0,
            8 => 4096.0,
            4 => 8192.0,
            2 => 16384.0,
            _ => 2048.0,
        }
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| SensorError::I2cError(format!("{:?}", e)))
    }

    /// Three big-endian axes starting at `register`
    fn read_raw(&mut self, register: u8) -> Result<[i16; 3], SensorError> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| SensorError::I2cError(format!("{:?}", e)))?;
        Ok([
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ])
    }
}

impl<I: I2c> AccelBackend for Mpu6500<I> {
    fn describe(&self) -> String {
        format!(
            "MPU6500 IMU (addr: 0x{:02X}) - Accel: ±{}g",
            self.address, self.accel_range
        )
    }

    fn read(&mut self) -> Result<[f32; 3], SensorError> {
        let raw = self.read_raw(ACCEL_XOUT_H)?;
        let sensitivity = self.sensitivity();
        Ok(raw.map(|axis| axis as f32 / sensitivity * STANDARD_GRAVITY))
    }

    fn read_companions(&mut self) -> Result<Vec<(SensorKind, [f32; 3])>, SensorError> {
        let raw = self.read_raw(GYRO_XOUT_H)?;
        let rad_per_s = raw.map(|axis| (axis as f32 / GYRO_SENSITIVITY).to_radians());
        Ok(vec![(SensorKind::Gyroscope, rad_per_s)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register file behind a single I2C address
    struct FakeBus {
        registers: [u8; 128],
        writes: Vec<Vec<u8>>,
        fail: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            Self {
                registers: [0; 128],
                writes: Vec::new(),
                fail: false,
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            let mut pointer = 0usize;
            for operation in operations {
                match operation {
                    Operation::Write(bytes) => {
                        self.writes.push(bytes.to_vec());
                        if let Some((&register, data)) = bytes.split_first() {
                            pointer = register as usize;
                            for (i, byte) in data.iter().enumerate() {
                                self.registers[pointer + i] = *byte;
                            }
                        }
                    }
                    Operation::Read(buf) => {
                        for (i, byte) in buf.iter_mut().enumerate() {
                            *byte = self.registers[pointer + i];
                        }
                        pointer += buf.len();
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_init_wakes_and_sets_range() {
        let sensor = Mpu6500::new(FakeBus::new(), 0x68, 8).unwrap();
        assert_eq!(sensor.i2c.writes[0], vec![PWR_MGMT_1, 0x00]);
        assert_eq!(sensor.i2c.writes[1], vec![ACCEL_CONFIG, 0x10]);
    }

    #[test]
    fn test_read_scales_to_meters_per_second_squared() {
        let mut bus = FakeBus::new();
        // x = +1g, y = -1g, z = +0.5g at ±2g
        bus.registers[0x3B..0x41].copy_from_slice(&[0x40, 0x00, 0xC0, 0x00, 0x20, 0x00]);

        let mut sensor = Mpu6500::new(bus, 0x68, 2).unwrap();
        let values = sensor.read().unwrap();
        assert!((values[0] - STANDARD_GRAVITY).abs() < 1e-4);
        assert!((values[1] + STANDARD_GRAVITY).abs() < 1e-4);
        assert!((values[2] - STANDARD_GRAVITY / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_bus_failure_during_init() {
        let mut bus = FakeBus::new();
        bus.fail = true;
        assert!(matches!(
            Mpu6500::new(bus, 0x68, 2),
            Err(SensorError::InitializationError(_))
        ));
    }

    #[test]
    fn test_describe_includes_address_and_range() {
        let sensor = Mpu6500::new(FakeBus::new(), 0x69, 16).unwrap();
        assert_eq!(sensor.describe(), "MPU6500 IMU (addr: 0x69) - Accel: ±16g");
    }

    #[test]
    fn test_gyro_reported_in_radians_per_second() {
        let mut bus = FakeBus::new();
        // x = +250 °/s, y = -131 LSB = -1 °/s
        bus.registers[0x43..0x49].copy_from_slice(&[0x7F, 0xEE, 0xFF, 0x7D, 0x00, 0x00]);

        let mut sensor = Mpu6500::new(bus, 0x68, 2).unwrap();
        let readings = sensor.read_companions().unwrap();
        assert_eq!(readings.len(), 1);
        let (kind, values) = readings[0];
        assert_eq!(kind, SensorKind::Gyroscope);
        assert!((values[0] - 250f32.to_radians()).abs() < 1e-3);
        assert!((values[1] + 1f32.to_radians()).abs() < 1e-4);
        assert_eq!(values[2], 0.0);
    }
}
