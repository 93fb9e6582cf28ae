//! Connectivity snapshot shown in the "System status" dialog.
//!
//! [`ConnectivityReport::gather`] asks a [`ConnectivityProbe`] for radio and
//! location state. [`SysfsProbe`] answers from Linux sysfs: rfkill switches for
//! Wi-Fi and Bluetooth, `wwan*`/`ppp*` interfaces for mobile data, a GPS device node
//! and fix file for location.

use crate::config::{ConnectivityConfig, LocationConfig};
use crate::error::PlatformError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const REPORT_TITLE: &str = "System status";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocationConfig> for Location {
    fn from(config: LocationConfig) -> Self {
        Self {
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationProvider {
    Gps,
    Network,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn wifi_enabled(&self) -> bool;
    async fn bluetooth_enabled(&self) -> bool;
    /// May fail when the state cannot be read; callers treat that as "off"
    async fn mobile_data_enabled(&self) -> Result<bool, PlatformError>;
    async fn gps_enabled(&self) -> bool;
    async fn last_known_location(&self, provider: LocationProvider) -> Option<Location>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum GpsStatus {
    Off,
    /// On, but no fix from either provider yet
    Searching,
    Located(Location),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectivityReport {
    pub wifi: bool,
    pub bluetooth: bool,
    pub mobile_data: bool,
    pub gps: GpsStatus,
}

impl ConnectivityReport {
    pub async fn gather<P: ConnectivityProbe + ?Sized>(probe: &P) -> Self {
        let wifi = probe.wifi_enabled().await;
        let bluetooth = probe.bluetooth_enabled().await;
        let mobile_data = match probe.mobile_data_enabled().await {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::debug!(error = %e, "mobile data state unavailable, reporting off");
                false
            }
        };

        let gps = if probe.gps_enabled().await {
            let fix = match probe.last_known_location(LocationProvider::Gps).await {
                Some(location) => Some(location),
                None => probe.last_known_location(LocationProvider::Network).await,
            };
            fix.map_or(GpsStatus::Searching, GpsStatus::Located)
        } else {
            GpsStatus::Off
        };

        let report = Self {
            wifi,
            bluetooth,
            mobile_data,
            gps,
        };
        tracing::info!(?report, "connectivity checked");
        report
    }

    /// Location offered for the map jump
    pub fn location(&self) -> Option<Location> {
        match self.gps {
            GpsStatus::Located(location) => Some(location),
            _ => None,
        }
    }

    /// One entry per dialog section
    pub fn sections(&self) -> Vec<String> {
        let mut gps = format!("GPS: {}", switch(self.gps != GpsStatus::Off));
        match &self.gps {
            GpsStatus::Off => {}
            GpsStatus::Searching => gps.push_str("\n(Searching for signal...)"),
            GpsStatus::Located(location) => gps.push_str(&format!(
                "\n📍 Lat: {}\n📍 Long: {}",
                location.latitude, location.longitude
            )),
        }

        vec![
            format!("Wi-Fi: {}", switch(self.wifi)),
            format!("Bluetooth: {}", switch(self.bluetooth)),
            format!("Mobile data: {}", switch(self.mobile_data)),
            gps,
        ]
    }

    /// Dialog body, sections separated by a blank line
    pub fn message(&self) -> String {
        self.sections().join("\n\n")
    }
}

fn switch(on: bool) -> &'static str {
    if on { "ON ✅" } else { "OFF ❌" }
}

/// Probe backed by Linux sysfs and the configured GPS files
pub struct SysfsProbe {
    sysfs_root: PathBuf,
    gps_device: Option<PathBuf>,
    gps_fix_file: Option<PathBuf>,
    network_location: Option<Location>,
}

impl SysfsProbe {
    pub fn from_config(config: &ConnectivityConfig) -> Self {
        Self {
            sysfs_root: config.sysfs_root.clone(),
            gps_device: config.gps_device.clone(),
            gps_fix_file: config.gps_fix_file.clone(),
            network_location: config.network_location.map(Location::from),
        }
    }

    /// True when some rfkill switch of `kind` is neither soft- nor hard-blocked
    async fn radio_unblocked(&self, kind: &str) -> bool {
        let dir = self.sysfs_root.join("class/rfkill");
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "rfkill unavailable");
                return false;
            }
        };

        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if read_trimmed(&path.join("type")).await.as_deref() != Some(kind) {
                continue;
            }
            let soft = read_trimmed(&path.join("soft")).await;
            let hard = read_trimmed(&path.join("hard")).await;
            if soft.as_deref() == Some("0") && hard.as_deref() == Some("0") {
                return true;
            }
        }
        false
    }

    async fn read_gps_fix(&self) -> Option<Location> {
        let path = self.gps_fix_file.as_ref()?;
        let text = read_trimmed(path).await?;
        match parse_fix(&text) {
            Some(location) => Some(location),
            None => {
                tracing::warn!(file = %path.display(), "malformed GPS fix, expected 'lat,lon'");
                None
            }
        }
    }
}

#[async_trait]
impl ConnectivityProbe for SysfsProbe {
    async fn wifi_enabled(&self) -> bool {
        self.radio_unblocked("wlan").await
    }

    async fn bluetooth_enabled(&self) -> bool {
        self.radio_unblocked("bluetooth").await
    }

    async fn mobile_data_enabled(&self) -> Result<bool, PlatformError> {
        let dir = self.sysfs_root.join("class/net");
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => {
                return Err(PlatformError::ProbeError(format!("{}: {}", dir.display(), e)));
            }
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PlatformError::ProbeError(e.to_string()))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !(name.starts_with("wwan") || name.starts_with("ppp")) {
                continue;
            }
            if read_trimmed(&entry.path().join("operstate")).await.as_deref() == Some("up") {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn gps_enabled(&self) -> bool {
        match &self.gps_device {
            Some(device) => tokio::fs::try_exists(device).await.unwrap_or(false),
            None => false,
        }
    }

    async fn last_known_location(&self, provider: LocationProvider) -> Option<Location> {
        match provider {
            LocationProvider::Gps => self.read_gps_fix().await,
            LocationProvider::Network => self.network_location,
        }
    }
}

async fn read_trimmed(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path)
        .await
        .ok()
        .map(|text| text.trim().to_string())
}

fn parse_fix(text: &str) -> Option<Location> {
    let (lat, lon) = text.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Location {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use std::fs;

    fn probe_with(
        wifi: bool,
        mobile: Result<bool, PlatformError>,
        gps: bool,
        gps_fix: Option<Location>,
        network_fix: Option<Location>,
    ) -> MockConnectivityProbe {
        let mut probe = MockConnectivityProbe::new();
        probe.expect_wifi_enabled().return_const(wifi);
        probe.expect_bluetooth_enabled().return_const(false);
        probe
            .expect_mobile_data_enabled()
            .return_once(move || mobile);
        probe.expect_gps_enabled().return_const(gps);
        probe
            .expect_last_known_location()
            .with(eq(LocationProvider::Gps))
            .return_const(gps_fix);
        probe
            .expect_last_known_location()
            .with(eq(LocationProvider::Network))
            .return_const(network_fix);
        probe
    }

    const RIGA: Location = Location {
        latitude: 56.9496,
        longitude: 24.1052,
    };

    #[tokio::test]
    async fn test_report_all_off() {
        let mut probe = MockConnectivityProbe::new();
        probe.expect_wifi_enabled().return_const(false);
        probe.expect_bluetooth_enabled().return_const(false);
        probe.expect_mobile_data_enabled().returning(|| Ok(false));
        probe.expect_gps_enabled().return_const(false);
        probe.expect_last_known_location().never();

        let report = ConnectivityReport::gather(&probe).await;
        assert_eq!(report.gps, GpsStatus::Off);
        assert_eq!(report.location(), None);
        assert_eq!(
            report.message(),
            "Wi-Fi: OFF ❌\n\nBluetooth: OFF ❌\n\nMobile data: OFF ❌\n\nGPS: OFF ❌"
        );
    }

    #[tokio::test]
    async fn test_mobile_data_error_reads_as_off() {
        let probe = probe_with(
            true,
            Err(PlatformError::ProbeError("permission denied".to_string())),
            false,
            None,
            None,
        );
        let report = ConnectivityReport::gather(&probe).await;
        assert!(report.wifi);
        assert!(!report.mobile_data);
    }

    #[tokio::test]
    async fn test_gps_fix_preferred_over_network() {
        let network = Location {
            latitude: 1.0,
            longitude: 2.0,
        };
        let probe = probe_with(true, Ok(true), true, Some(RIGA), Some(network));
        let report = ConnectivityReport::gather(&probe).await;
        assert_eq!(report.location(), Some(RIGA));
        assert!(report.message().ends_with("GPS: ON ✅\n📍 Lat: 56.9496\n📍 Long: 24.1052"));
    }

    #[tokio::test]
    async fn test_network_location_fallback() {
        let probe = probe_with(false, Ok(false), true, None, Some(RIGA));
        let report = ConnectivityReport::gather(&probe).await;
        assert_eq!(report.gps, GpsStatus::Located(RIGA));
    }

    #[tokio::test]
    async fn test_gps_on_without_fix_is_searching() {
        let probe = probe_with(false, Ok(false), true, None, None);
        let report = ConnectivityReport::gather(&probe).await;
        assert_eq!(report.gps, GpsStatus::Searching);
        assert_eq!(report.location(), None);
        assert!(report.message().ends_with("GPS: ON ✅\n(Searching for signal...)"));
    }

    fn rfkill(root: &Path, name: &str, kind: &str, soft: &str, hard: &str) {
        let dir = root.join("class/rfkill").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("type"), format!("{}\n", kind)).unwrap();
        fs::write(dir.join("soft"), format!("{}\n", soft)).unwrap();
        fs::write(dir.join("hard"), format!("{}\n", hard)).unwrap();
    }

    fn interface(root: &Path, name: &str, operstate: &str) {
        let dir = root.join("class/net").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("operstate"), format!("{}\n", operstate)).unwrap();
    }

    fn sysfs_probe(root: &Path) -> SysfsProbe {
        SysfsProbe::from_config(&ConnectivityConfig {
            sysfs_root: root.to_path_buf(),
            ..ConnectivityConfig::default()
        })
    }

    #[tokio::test]
    async fn test_sysfs_radios() {
        let root = tempfile::tempdir().unwrap();
        rfkill(root.path(), "rfkill0", "wlan", "0", "0");
        rfkill(root.path(), "rfkill1", "bluetooth", "1", "0");

        let probe = sysfs_probe(root.path());
        assert!(probe.wifi_enabled().await);
        assert!(!probe.bluetooth_enabled().await);
    }

    #[tokio::test]
    async fn test_sysfs_without_rfkill_reports_off() {
        let root = tempfile::tempdir().unwrap();
        let probe = sysfs_probe(root.path());
        assert!(!probe.wifi_enabled().await);
        assert!(!probe.bluetooth_enabled().await);
        assert!(!probe.mobile_data_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_sysfs_mobile_data() {
        let root = tempfile::tempdir().unwrap();
        interface(root.path(), "eth0", "up");
        interface(root.path(), "wwan0", "down");
        let probe = sysfs_probe(root.path());
        assert!(!probe.mobile_data_enabled().await.unwrap());

        interface(root.path(), "ppp0", "up");
        assert!(probe.mobile_data_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_sysfs_gps_device_and_fix() {
        let root = tempfile::tempdir().unwrap();
        let device = root.path().join("ttyACM0");
        let fix = root.path().join("fix");
        fs::write(&device, "").unwrap();
        fs::write(&fix, "56.9496, 24.1052\n").unwrap();

        let probe = SysfsProbe::from_config(&ConnectivityConfig {
            sysfs_root: root.path().to_path_buf(),
            gps_device: Some(device),
            gps_fix_file: Some(fix),
            network_location: Some(LocationConfig {
                latitude: 0.5,
                longitude: 0.5,
            }),
        });

        assert!(probe.gps_enabled().await);
        assert_eq!(probe.last_known_location(LocationProvider::Gps).await, Some(RIGA));
        assert_eq!(
            probe.last_known_location(LocationProvider::Network).await,
            Some(Location {
                latitude: 0.5,
                longitude: 0.5
            })
        );
    }

    #[tokio::test]
    async fn test_sysfs_gps_absent_device() {
        let root = tempfile::tempdir().unwrap();
        let probe = SysfsProbe::from_config(&ConnectivityConfig {
            sysfs_root: root.path().to_path_buf(),
            gps_device: Some(root.path().join("missing")),
            ..ConnectivityConfig::default()
        });
        assert!(!probe.gps_enabled().await);
        assert_eq!(probe.last_known_location(LocationProvider::Gps).await, None);
    }

    #[test]
    fn test_parse_fix() {
        assert_eq!(parse_fix("56.9496,24.1052"), Some(RIGA));
        assert_eq!(parse_fix("56.9496"), None);
        assert_eq!(parse_fix("north,east"), None);
        assert_eq!(parse_fix("95.0,10.0"), None);
    }
}
