//! JSON persistence for scan and monitor results.
//!
//! A scan written here is the only interchange format between a scan run
//! and a later `analyze` run.

use crate::error::RfResult;
use crate::types::{MonitorResult, ScanResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write any result as pretty-printed JSON
pub fn save_json<T: Serialize>(value: &T, path: &Path) -> RfResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    debug!("Wrote {:?}", path);
    Ok(())
}

/// Read any result from a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> RfResult<T> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    debug!("Read {:?}", path);
    Ok(value)
}

impl ScanResult {
    pub fn save(&self, path: &Path) -> RfResult<()> {
        save_json(self, path)
    }

    /// Load a scan; the summary is recomputed from the stored devices
    pub fn load(path: &Path) -> RfResult<Self> {
        load_json(path)
    }
}

impl MonitorResult {
    pub fn save(&self, path: &Path) -> RfResult<()> {
        save_json(self, path)
    }

    pub fn load(path: &Path) -> RfResult<Self> {
        load_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RfError;
    use crate::types::{
        ActivitySample, Band, DeviceSighting, ScanBand, ScanInfo, SecurityType,
    };
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn timestamp(second: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_micro_opt(9, 30, second, 250_000)
            .unwrap()
    }

    fn sample_scan() -> ScanResult {
        let entries = [
            (6, -41, Some("Home_Network"), SecurityType::Wpa2),
            (149, -77, None, SecurityType::Open),
            (11, -58, Some("Guest"), SecurityType::Wpa3),
        ];
        let devices = entries
            .into_iter()
            .enumerate()
            .map(|(i, (channel, strength, ssid, security))| DeviceSighting {
                channel,
                strength_dbm: strength,
                ssid: ssid.map(str::to_string),
                band: ScanBand::All.band_of(channel),
                security,
                first_seen: timestamp(i as u32 + 1),
                last_seen: timestamp(i as u32 + 1),
            })
            .collect();

        ScanResult::with_devices(
            ScanInfo {
                band: ScanBand::All,
                channels: ScanBand::All.channels(),
                start_time: timestamp(0),
                duration_seconds: 20.0,
            },
            devices,
        )
    }

    #[test]
    fn test_scan_roundtrip_preserves_devices() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan.json");

        let original = sample_scan();
        original.save(&path).unwrap();
        let loaded = ScanResult::load(&path).unwrap();

        assert_eq!(loaded.devices(), original.devices());
        assert_eq!(loaded.summary(), original.summary());
        assert_eq!(loaded.devices()[1].band, Band::FiveGhz);
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_recomputes_stale_summary() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stale.json");

        let mut value = serde_json::to_value(sample_scan()).unwrap();
        value["summary"]["totalSignals"] = serde_json::json!(99);
        value["summary"]["avgStrength"] = serde_json::json!(-1);
        std::fs::write(&path, value.to_string()).unwrap();

        let loaded = ScanResult::load(&path).unwrap();
        assert_eq!(loaded.summary().total_signals, 3);
        assert_eq!(loaded.summary().avg_strength, -58);
    }

    #[test]
    fn test_load_legacy_snake_case_scan() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy.json");
        std::fs::write(
            &path,
            r#"{
              "devices": [
                {"channel": 3, "strength": -35, "ssid": "NETGEAR", "band": "2.4G",
                 "security": "WEP", "first_seen": "2024-06-01T09:30:01.000001",
                 "last_seen": "2024-06-01T09:30:01.000001"}
              ],
              "scan_info": {"band": "2.4G", "channels": [1, 2, 3],
                            "start_time": "2024-06-01T09:30:00", "duration": 60},
              "summary": {"total_signals": 1, "avg_strength": -35, "max_strength": -35,
                          "min_strength": -35, "channels": [3], "duration": 60}
            }"#,
        )
        .unwrap();

        let loaded = ScanResult::load(&path).unwrap();
        assert_eq!(loaded.scan_info.duration_seconds, 60.0);
        assert_eq!(loaded.devices()[0].security, SecurityType::Wep);
        assert_eq!(loaded.summary().max_strength, -35);
    }

    #[test]
    fn test_monitor_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("monitor.json");

        let result = MonitorResult {
            channel: 6,
            duration: 3.0,
            activity: (0..3)
                .map(|i| ActivitySample {
                    timestamp: timestamp(i),
                    strength_dbm: -50 - i as i32,
                    packet_count: 100 * i,
                })
                .collect(),
        };
        result.save(&path).unwrap();

        assert_eq!(MonitorResult::load(&path).unwrap(), result);
    }

    #[test]
    fn test_load_legacy_monitor_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("legacy_monitor.json");
        std::fs::write(
            &path,
            r#"{
              "channel": 6,
              "duration": 300,
              "activity": [
                {"timestamp": "14:03:22", "strength": -50, "packets": 17},
                {"timestamp": "14:03:23", "strength": -88, "packets": 0}
              ]
            }"#,
        )
        .unwrap();

        let loaded = MonitorResult::load(&path).unwrap();
        assert_eq!(loaded.channel, 6);
        assert_eq!(loaded.duration, 300.0);
        assert_eq!(loaded.activity.len(), 2);
        assert_eq!(loaded.activity[0].strength_dbm, -50);
        assert_eq!(loaded.activity[0].packet_count, 17);
        assert_eq!(
            loaded.activity[0].timestamp.time(),
            chrono::NaiveTime::from_hms_opt(14, 3, 22).unwrap()
        );
        assert!(loaded.activity[0].timestamp < loaded.activity[1].timestamp);
    }

    #[test]
    fn test_load_bad_sample_time() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_monitor.json");
        std::fs::write(
            &path,
            r#"{"channel": 6, "duration": 1,
                "activity": [{"timestamp": "teatime", "strength": -50, "packets": 1}]}"#,
        )
        .unwrap();

        let err = MonitorResult::load(&path).unwrap_err();
        assert!(matches!(err, RfError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ScanResult::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, RfError::Io(_)));
    }
}
