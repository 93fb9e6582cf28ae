//! Linux Industrial I/O accelerometer read through sysfs.
//!
//! Each axis is `(in_<channel>_<axis>_raw + offset) * scale`, in the kernel's units
//! (m/s² for `accel`, rad/s for `anglvel`, gauss for `magn`). Per-axis scale/offset
//! attributes win over the shared ones. Gyroscope and magnetometer channels on the
//! same device are read alongside the accelerometer.

use super::AccelBackend;
use crate::error::SensorError;
use crate::readout::SensorKind;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const AXES: [&str; 3] = ["x", "y", "z"];

/// Channel types a motion device may carry next to `accel`
const COMPANIONS: [(&str, SensorKind); 2] = [
    ("anglvel", SensorKind::Gyroscope),
    ("magn", SensorKind::MagneticField),
];

/// One 3-axis IIO channel type with its calibration
struct Channel {
    prefix: &'static str,
    kind: SensorKind,
    scales: [f64; 3],
    offsets: [f64; 3],
}

impl Channel {
    fn open(dir: &Path, prefix: &'static str, kind: SensorKind) -> Result<Self, SensorError> {
        let shared_scale = read_optional(&dir.join(format!("in_{}_scale", prefix)))?.unwrap_or(1.0);
        let shared_offset =
            read_optional(&dir.join(format!("in_{}_offset", prefix)))?.unwrap_or(0.0);

        let mut scales = [shared_scale; 3];
        let mut offsets = [shared_offset; 3];
        for (i, axis) in AXES.iter().enumerate() {
            if let Some(scale) = read_optional(&dir.join(format!("in_{}_{}_scale", prefix, axis)))? {
                scales[i] = scale;
            }
            if let Some(offset) =
                read_optional(&dir.join(format!("in_{}_{}_offset", prefix, axis)))?
            {
                offsets[i] = offset;
            }
        }

        Ok(Self {
            prefix,
            kind,
            scales,
            offsets,
        })
    }

    fn read(&self, dir: &Path) -> Result<[f32; 3], SensorError> {
        let mut values = [0.0f32; 3];
        for (i, axis) in AXES.iter().enumerate() {
            let raw = read_value(&dir.join(format!("in_{}_{}_raw", self.prefix, axis)))?;
            values[i] = ((raw + self.offsets[i]) * self.scales[i]) as f32;
        }
        Ok(values)
    }
}

pub struct IioAccelerometer {
    device_dir: PathBuf,
    name: String,
    accel: Channel,
    companions: Vec<Channel>,
}

impl IioAccelerometer {
    /// First device under `root` (sorted by path) that exposes accelerometer channels.
    /// A missing root is treated as "no device".
    pub fn discover(root: &Path) -> Result<Option<Self>, SensorError> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SensorError::ReadError(format!(
                    "{}: {}",
                    root.display(),
                    e
                )));
            }
        };

        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.join("in_accel_x_raw").exists())
            .collect();
        candidates.sort();

        match candidates.into_iter().next() {
            Some(dir) => Self::open(&dir).map(Some),
            None => Ok(None),
        }
    }

    pub fn open(dir: &Path) -> Result<Self, SensorError> {
        let name = fs::read_to_string(dir.join("name"))
            .map(|name| name.trim().to_string())
            .unwrap_or_else(|_| {
                dir.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "iio".to_string())
            });

        let accel = Channel::open(dir, "accel", SensorKind::Accelerometer)?;
        let mut companions = Vec::new();
        for (prefix, kind) in COMPANIONS {
            if dir.join(format!("in_{}_x_raw", prefix)).exists() {
                companions.push(Channel::open(dir, prefix, kind)?);
            }
        }

        tracing::debug!(
            device = %dir.display(),
            %name,
            scales = ?accel.scales,
            companions = companions.len(),
            "IIO accelerometer opened"
        );

        Ok(Self {
            device_dir: dir.to_path_buf(),
            name,
            accel,
            companions,
        })
    }
}

impl AccelBackend for IioAccelerometer {
    fn describe(&self) -> String {
        format!("{} (IIO {})", self.name, self.device_dir.display())
    }

    fn read(&mut self) -> Result<[f32; 3], SensorError> {
        self.accel.read(&self.device_dir)
    }

    fn read_companions(&mut self) -> Result<Vec<(SensorKind, [f32; 3])>, SensorError> {
        self.companions
            .iter()
            .map(|channel| Ok((channel.kind, channel.read(&self.device_dir)?)))
            .collect()
    }
}

fn read_value(path: &Path) -> Result<f64, SensorError> {
    let text = fs::read_to_string(path)
        .map_err(|e| SensorError::ReadError(format!("{}: {}", path.display(), e)))?;
    parse_value(path, &text)
}

fn read_optional(path: &Path) -> Result<Option<f64>, SensorError> {
    match fs::read_to_string(path) {
        Ok(text) => parse_value(path, &text).map(Some),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SensorError::ReadError(format!("{}: {}", path.display(), e))),
    }
}

fn parse_value(path: &Path, text: &str) -> Result<f64, SensorError> {
    text.trim().parse::<f64>().map_err(|e| SensorError::ParseError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_device(root: &Path, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, contents) in files {
            fs::write(dir.join(file), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_missing_root_is_no_device() {
        let root = tempfile::tempdir().unwrap();
        let result = IioAccelerometer::discover(&root.path().join("absent")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_skips_devices_without_accel_channels() {
        let root = tempfile::tempdir().unwrap();
        write_device(root.path(), "iio:device0", &[("name", "als\n"), ("in_illuminance_raw", "12\n")]);
        assert!(IioAccelerometer::discover(root.path()).unwrap().is_none());
    }

    #[test]
    fn test_reads_scaled_values() {
        let root = tempfile::tempdir().unwrap();
        write_device(
            root.path(),
            "iio:device1",
            &[
                ("name", "lis3dh\n"),
                ("in_accel_scale", "0.009806650\n"),
                ("in_accel_x_raw", "100\n"),
                ("in_accel_y_raw", "-408\n"),
                ("in_accel_z_raw", "1000\n"),
            ],
        );

        let mut device = IioAccelerometer::discover(root.path()).unwrap().unwrap();
        assert!(device.describe().starts_with("lis3dh"));

        let values = device.read().unwrap();
        assert!((values[0] - 0.980665).abs() < 1e-5);
        assert!((values[1] - -4.0011133).abs() < 1e-4);
        assert!((values[2] - 9.80665).abs() < 1e-4);
    }

    #[test]
    fn test_per_axis_scale_and_offset() {
        let root = tempfile::tempdir().unwrap();
        write_device(
            root.path(),
            "iio:device0",
            &[
                ("in_accel_scale", "1.0"),
                ("in_accel_z_scale", "0.5"),
                ("in_accel_offset", "2"),
                ("in_accel_x_raw", "1"),
                ("in_accel_y_raw", "2"),
                ("in_accel_z_raw", "4"),
            ],
        );

        let mut device = IioAccelerometer::discover(root.path()).unwrap().unwrap();
        assert_eq!(device.read().unwrap(), [3.0, 4.0, 3.0]);
    }

    #[test]
    fn test_picks_first_device_in_path_order() {
        let root = tempfile::tempdir().unwrap();
        write_device(root.path(), "iio:device3", &[("name", "second"), ("in_accel_x_raw", "0")]);
        write_device(root.path(), "iio:device1", &[("name", "first"), ("in_accel_x_raw", "0")]);

        let device = IioAccelerometer::discover(root.path()).unwrap().unwrap();
        assert!(device.describe().starts_with("first"));
    }

    #[test]
    fn test_malformed_raw_value_is_error() {
        let root = tempfile::tempdir().unwrap();
        write_device(
            root.path(),
            "iio:device0",
            &[
                ("in_accel_x_raw", "n/a"),
                ("in_accel_y_raw", "0"),
                ("in_accel_z_raw", "0"),
            ],
        );

        let mut device = IioAccelerometer::discover(root.path()).unwrap().unwrap();
        assert!(matches!(device.read(), Err(SensorError::ParseError { .. })));
    }

    #[test]
    fn test_reads_gyroscope_and_magnetometer_channels() {
        let root = tempfile::tempdir().unwrap();
        write_device(
            root.path(),
            "iio:device0",
            &[
                ("name", "mpu6050\n"),
                ("in_accel_x_raw", "0"),
                ("in_accel_y_raw", "0"),
                ("in_accel_z_raw", "10"),
                ("in_anglvel_scale", "0.5"),
                ("in_anglvel_x_raw", "2"),
                ("in_anglvel_y_raw", "-4"),
                ("in_anglvel_z_raw", "0"),
                ("in_magn_x_raw", "1"),
                ("in_magn_y_raw", "2"),
                ("in_magn_z_raw", "3"),
            ],
        );

        let mut device = IioAccelerometer::discover(root.path()).unwrap().unwrap();
        assert_eq!(device.read().unwrap(), [0.0, 0.0, 10.0]);
        assert_eq!(
            device.read_companions().unwrap(),
            vec![
                (SensorKind::Gyroscope, [1.0, -2.0, 0.0]),
                (SensorKind::MagneticField, [1.0, 2.0, 3.0]),
            ]
        );
    }

    #[test]
    fn test_accelerometer_only_device_has_no_companions() {
        let root = tempfile::tempdir().unwrap();
        write_device(
            root.path(),
            "iio:device0",
            &[("in_accel_x_raw", "0"), ("in_accel_y_raw", "0"), ("in_accel_z_raw", "0")],
        );

        let mut device = IioAccelerometer::discover(root.path()).unwrap().unwrap();
        assert!(device.read_companions().unwrap().is_empty());
    }
}
