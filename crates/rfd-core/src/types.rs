//! Scan Data Model
//!
//! Bands, channel plans and the records produced by scan sessions and
//! channel monitors. Everything here is plain data: records are created once
//! and collected into a result, never edited in place.
//!
//! ## Persisted Shape
//!
//! ```text
//! ScanResult
//! ├── scanInfo  { band, channels, startTime, durationSeconds }
//! ├── devices   [ DeviceSighting, ... ]      (detection order)
//! └── summary   { totalSignals, avgStrength, maxStrength,
//!                 minStrength, channels, duration }
//! ```
//!
//! Field names are camelCase on write. Snake_case files written by older
//! tooling (`scan_info`, `strength`, `first_seen`, ...) are accepted on read.

use crate::analysis::statistics::ScanSummary;
use crate::error::{RfError, RfResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weakest signal strength a sighting can report (dBm)
pub const MIN_STRENGTH_DBM: i32 = -90;
/// Strongest signal strength a sighting can report (dBm)
pub const MAX_STRENGTH_DBM: i32 = -20;
/// Largest packet count a monitor tick can report
pub const MAX_PACKET_COUNT: u32 = 1000;

/// 2.4 GHz channels 1-13
pub const CHANNELS_2G: [u32; 13] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];

/// 5 GHz channel plan (UNII-1 through UNII-3)
pub const CHANNELS_5G: [u32; 25] = [
    36, 40, 44, 48, 52, 56, 60, 64, 100, 104, 108, 112, 116, 120, 124, 128, 132, 136, 140, 144,
    149, 153, 157, 161, 165,
];

/// Frequency band of a single channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Band {
    #[serde(rename = "2.4G")]
    TwoPointFourGhz,
    #[serde(rename = "5G")]
    FiveGhz,
}

impl Band {
    /// Valid channels for this band
    pub fn channels(&self) -> &'static [u32] {
        match self {
            Band::TwoPointFourGhz => &CHANNELS_2G,
            Band::FiveGhz => &CHANNELS_5G,
        }
    }

    /// Whether `channel` belongs to this band
    pub fn contains(&self, channel: u32) -> bool {
        self.channels().contains(&channel)
    }

    /// Look up the band a channel belongs to
    pub fn for_channel(channel: u32) -> Option<Band> {
        [Band::TwoPointFourGhz, Band::FiveGhz]
            .into_iter()
            .find(|band| band.contains(channel))
    }

    /// Center frequency of `channel` in MHz, if it belongs to this band
    pub fn center_frequency_mhz(&self, channel: u32) -> Option<u32> {
        if !self.contains(channel) {
            return None;
        }
        match self {
            Band::TwoPointFourGhz => Some(2407 + 5 * channel),
            Band::FiveGhz => Some(5000 + 5 * channel),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::TwoPointFourGhz => "2.4G",
            Band::FiveGhz => "5G",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band selection for a scan session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanBand {
    #[serde(rename = "2.4G")]
    TwoPointFourGhz,
    #[serde(rename = "5G")]
    FiveGhz,
    #[serde(rename = "all")]
    All,
}

impl ScanBand {
    /// Resolve the channel set to sweep (2.4G channels first for `all`)
    pub fn channels(&self) -> Vec<u32> {
        match self {
            ScanBand::TwoPointFourGhz => CHANNELS_2G.to_vec(),
            ScanBand::FiveGhz => CHANNELS_5G.to_vec(),
            ScanBand::All => CHANNELS_2G.iter().chain(CHANNELS_5G.iter()).copied().collect(),
        }
    }

    /// Band recorded on a sighting made on `channel` during this scan
    pub fn band_of(&self, channel: u32) -> Band {
        match self {
            ScanBand::TwoPointFourGhz => Band::TwoPointFourGhz,
            ScanBand::FiveGhz => Band::FiveGhz,
            ScanBand::All => Band::for_channel(channel).unwrap_or(Band::TwoPointFourGhz),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScanBand::TwoPointFourGhz => "2.4G",
            ScanBand::FiveGhz => "5G",
            ScanBand::All => "all",
        }
    }
}

impl FromStr for ScanBand {
    type Err = RfError;

    fn from_str(s: &str) -> RfResult<Self> {
        match s {
            "2.4G" => Ok(ScanBand::TwoPointFourGhz),
            "5G" => Ok(ScanBand::FiveGhz),
            "all" => Ok(ScanBand::All),
            _ => Err(RfError::InvalidBand(s.to_string())),
        }
    }
}

impl fmt::Display for ScanBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advertised security of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityType {
    #[serde(rename = "WPA2")]
    Wpa2,
    #[serde(rename = "WPA3")]
    Wpa3,
    #[serde(rename = "WEP")]
    Wep,
    Open,
    /// Missing or unrecognized in a loaded file; never generated
    Unknown,
}

impl SecurityType {
    /// Values a simulated network can advertise
    pub const ADVERTISED: [SecurityType; 4] = [
        SecurityType::Wpa2,
        SecurityType::Wpa3,
        SecurityType::Wep,
        SecurityType::Open,
    ];

    /// Parse a label, falling back to `Unknown`
    pub fn from_label(label: &str) -> Self {
        match label {
            "WPA2" => SecurityType::Wpa2,
            "WPA3" => SecurityType::Wpa3,
            "WEP" => SecurityType::Wep,
            "Open" => SecurityType::Open,
            _ => SecurityType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityType::Wpa2 => "WPA2",
            SecurityType::Wpa3 => "WPA3",
            SecurityType::Wep => "WEP",
            SecurityType::Open => "Open",
            SecurityType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SecurityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One simulated observation of a wireless network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SightingRecord")]
pub struct DeviceSighting {
    pub channel: u32,
    /// Received signal strength, always within [-90, -20]
    pub strength_dbm: i32,
    /// `None` for a hidden network
    pub ssid: Option<String>,
    pub band: Band,
    pub security: SecurityType,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
}

impl DeviceSighting {
    /// SSID for display, with hidden networks labelled
    pub fn display_ssid(&self) -> &str {
        match self.ssid.as_deref() {
            Some(ssid) if !ssid.is_empty() => ssid,
            _ => "Hidden Network",
        }
    }
}

/// On-disk sighting, lenient about band and security values
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SightingRecord {
    channel: u32,
    #[serde(alias = "strength")]
    strength_dbm: i32,
    #[serde(default)]
    ssid: Option<String>,
    #[serde(default)]
    band: Option<String>,
    #[serde(default)]
    security: Option<String>,
    #[serde(alias = "first_seen")]
    first_seen: NaiveDateTime,
    #[serde(alias = "last_seen")]
    last_seen: NaiveDateTime,
}

impl From<SightingRecord> for DeviceSighting {
    fn from(record: SightingRecord) -> Self {
        let band = match record.band.as_deref() {
            Some("2.4G") => Band::TwoPointFourGhz,
            Some("5G") => Band::FiveGhz,
            _ => Band::for_channel(record.channel).unwrap_or(Band::TwoPointFourGhz),
        };
        let security = record
            .security
            .as_deref()
            .map(SecurityType::from_label)
            .unwrap_or(SecurityType::Unknown);

        Self {
            channel: record.channel,
            strength_dbm: record.strength_dbm,
            ssid: record.ssid,
            band,
            security,
            first_seen: record.first_seen,
            last_seen: record.last_seen,
        }
    }
}

/// One channel-activity reading taken by a monitor tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySample {
    /// Older monitor files store only the time of day; those load on 1970-01-01
    #[serde(deserialize_with = "deserialize_sample_time")]
    pub timestamp: NaiveDateTime,
    #[serde(alias = "strength")]
    pub strength_dbm: i32,
    #[serde(alias = "packets")]
    pub packet_count: u32,
}

fn deserialize_sample_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(timestamp) = raw.parse::<NaiveDateTime>() {
        return Ok(timestamp);
    }

    let time = NaiveTime::parse_from_str(&raw, "%H:%M:%S").map_err(de::Error::custom)?;
    let date = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| de::Error::custom("invalid fallback date"))?;
    Ok(NaiveDateTime::new(date, time))
}

/// Parameters a scan was started with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanInfo {
    pub band: ScanBand,
    pub channels: Vec<u32>,
    #[serde(alias = "start_time")]
    pub start_time: NaiveDateTime,
    /// Requested time budget in seconds
    #[serde(alias = "duration")]
    pub duration_seconds: f64,
}

/// Aggregate output of a scan session
///
/// The summary is computed whenever a result is built or loaded, and the
/// device list cannot change afterwards, so a summary read from a
/// `ScanResult` always describes exactly the devices it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredScan")]
pub struct ScanResult {
    pub scan_info: ScanInfo,
    devices: Vec<DeviceSighting>,
    summary: ScanSummary,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredScan {
    #[serde(alias = "scan_info")]
    scan_info: ScanInfo,
    #[serde(default)]
    devices: Vec<DeviceSighting>,
}

impl From<StoredScan> for ScanResult {
    fn from(stored: StoredScan) -> Self {
        Self::with_devices(stored.scan_info, stored.devices)
    }
}

impl ScanResult {
    /// Create an empty result for a scan about to start
    pub fn new(scan_info: ScanInfo) -> Self {
        Self::with_devices(scan_info, Vec::new())
    }

    /// Build a result from already collected sightings
    pub fn with_devices(scan_info: ScanInfo, devices: Vec<DeviceSighting>) -> Self {
        let summary = ScanSummary::compute(&devices, scan_info.duration_seconds);
        Self {
            scan_info,
            devices,
            summary,
        }
    }

    /// Sightings in detection order
    pub fn devices(&self) -> &[DeviceSighting] {
        &self.devices
    }

    pub fn summary(&self) -> &ScanSummary {
        &self.summary
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Consume the result, keeping only the sightings
    pub fn into_devices(self) -> Vec<DeviceSighting> {
        self.devices
    }
}

/// Aggregate output of a channel monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorResult {
    pub channel: u32,
    /// Requested time budget in seconds
    pub duration: f64,
    pub activity: Vec<ActivitySample>,
}
