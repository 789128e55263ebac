//! Scan Analysis Report
//!
//! Descriptive statistics and groupings over a finished scan. The reporter
//! only reads the scan; drawing the optional plots is left to
//! [`crate::analysis::render`].

use crate::analysis::plots::PlotSet;
use crate::analysis::statistics::display_mean;
use crate::error::RfResult;
use crate::types::{DeviceSighting, ScanResult, SecurityType};
use indexmap::IndexMap;
use serde::Serialize;

/// Default number of strongest devices listed
pub const DEFAULT_TOP_N: usize = 5;

/// Notice attached to a report built from a scan without sightings
pub const NO_DATA_NOTICE: &str = "No data to analyze";

/// Whether an SSID counts as a hidden network
pub fn is_hidden_ssid(ssid: Option<&str>) -> bool {
    matches!(ssid, None | Some("") | Some("Hidden"))
}

/// Count sightings per security type, in first-seen order
pub fn security_counts(devices: &[DeviceSighting]) -> IndexMap<SecurityType, usize> {
    let mut counts = IndexMap::new();
    for device in devices {
        *counts.entry(device.security).or_insert(0) += 1;
    }
    counts
}

/// Strongest `n` sightings, ties kept in detection order
pub fn strongest(devices: &[DeviceSighting], n: usize) -> Vec<DeviceSighting> {
    let mut ranked: Vec<&DeviceSighting> = devices.iter().collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.strength_dbm.cmp(&a.strength_dbm));
    ranked.into_iter().take(n).cloned().collect()
}

/// Result of analyzing a scan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Set when there was nothing to analyze
    pub notice: Option<String>,
    pub total_networks: usize,
    /// Distinct channels, ascending
    pub active_channels: Vec<u32>,
    /// (weakest, strongest) in dBm
    pub strength_range: Option<(i32, i32)>,
    /// Mean strength rounded to one decimal
    pub display_mean: f64,
    pub visible_networks: usize,
    pub hidden_networks: usize,
    pub security_counts: IndexMap<SecurityType, usize>,
    pub top_devices: Vec<DeviceSighting>,
    /// Only present when derived plots were requested
    pub plots: Option<PlotSet>,
}

impl AnalysisReport {
    fn no_data() -> Self {
        Self {
            notice: Some(NO_DATA_NOTICE.to_string()),
            total_networks: 0,
            active_channels: Vec::new(),
            strength_range: None,
            display_mean: 0.0,
            visible_networks: 0,
            hidden_networks: 0,
            security_counts: IndexMap::new(),
            top_devices: Vec::new(),
            plots: None,
        }
    }

    /// True when the report was built from an empty scan
    pub fn is_empty(&self) -> bool {
        self.total_networks == 0
    }

    /// Format as text report
    pub fn to_text(&self) -> String {
        if let Some(notice) = &self.notice {
            return format!("{}\n", notice);
        }

        let mut output = String::new();
        output.push_str("RF Signal Detector - Comprehensive Analysis\n");
        output.push_str(&"═".repeat(60));
        output.push('\n');

        output.push_str(&format!("Total Networks Detected: {}\n", self.total_networks));
        output.push_str(&format!("Channels with Activity:  {:?}\n", self.active_channels));
        if let Some((min, max)) = self.strength_range {
            output.push_str(&format!("Signal Strength Range:   {} to {} dBm\n", min, max));
        }
        output.push_str(&format!("Average Signal Strength: {:.1} dBm\n", self.display_mean));
        output.push_str(&format!("Visible Networks:        {}\n", self.visible_networks));
        output.push_str(&format!("Hidden Networks:         {}\n", self.hidden_networks));

        output.push_str("\nSecurity Types\n");
        output.push_str(&"─".repeat(60));
        output.push('\n');
        for (security, count) in &self.security_counts {
            output.push_str(&format!("  {}: {} networks\n", security, count));
        }

        output.push_str(&format!("\nTop {} Strongest Signals\n", self.top_devices.len()));
        output.push_str(&"─".repeat(60));
        output.push('\n');
        for (i, device) in self.top_devices.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} - {} dBm (Channel {})\n",
                i + 1,
                device.display_ssid(),
                device.strength_dbm,
                device.channel
            ));
        }

        output
    }

    /// Format as JSON
    pub fn to_json(&self) -> RfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Analysis configuration
#[derive(Debug, Clone)]
pub struct AnalysisReporter {
    top_n: usize,
}

impl Default for AnalysisReporter {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AnalysisReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many of the strongest devices to list
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Analyze a scan, optionally computing the data behind the plots
    pub fn analyze(&self, result: &ScanResult, compute_derived_plots: bool) -> AnalysisReport {
        let devices = result.devices();
        if devices.is_empty() {
            return AnalysisReport::no_data();
        }

        let strengths: Vec<i32> = devices.iter().map(|d| d.strength_dbm).collect();
        let mut active_channels: Vec<u32> = devices.iter().map(|d| d.channel).collect();
        active_channels.sort_unstable();
        active_channels.dedup();

        let min = strengths.iter().copied().min().unwrap_or_default();
        let max = strengths.iter().copied().max().unwrap_or_default();

        let hidden_networks = devices
            .iter()
            .filter(|d| is_hidden_ssid(d.ssid.as_deref()))
            .count();
        let visible_networks = devices.len() - hidden_networks;

        let security_counts = security_counts(devices);
        let plots = compute_derived_plots.then(|| {
            PlotSet::compute(devices, &security_counts, visible_networks, hidden_networks)
        });

        AnalysisReport {
            notice: None,
            total_networks: devices.len(),
            active_channels,
            strength_range: Some((min, max)),
            display_mean: display_mean(&strengths),
            visible_networks,
            hidden_networks,
            security_counts,
            top_devices: strongest(devices, self.top_n),
            plots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Band, ScanBand, ScanInfo};
    use chrono::NaiveDate;

    fn scan(entries: &[(u32, i32, Option<&str>, SecurityType)]) -> ScanResult {
        let seen = NaiveDate::from_ymd_opt(2024, 2, 2)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let devices = entries
            .iter()
            .map(|&(channel, strength_dbm, ssid, security)| DeviceSighting {
                channel,
                strength_dbm,
                ssid: ssid.map(str::to_string),
                band: Band::TwoPointFourGhz,
                security,
                first_seen: seen,
                last_seen: seen,
            })
            .collect();
        ScanResult::with_devices(
            ScanInfo {
                band: ScanBand::TwoPointFourGhz,
                channels: ScanBand::TwoPointFourGhz.channels(),
                start_time: seen,
                duration_seconds: 10.0,
            },
            devices,
        )
    }

    #[test]
    fn test_empty_scan_reports_no_data() {
        let report = AnalysisReporter::new().analyze(&scan(&[]), true);
        assert!(report.is_empty());
        assert_eq!(report.notice.as_deref(), Some(NO_DATA_NOTICE));
        assert!(report.plots.is_none());
        assert_eq!(report.to_text(), "No data to analyze\n");
    }

    #[test]
    fn test_top_ranking_is_stable() {
        let result = scan(&[
            (1, -30, Some("first"), SecurityType::Wpa2),
            (2, -90, Some("weak"), SecurityType::Wpa2),
            (3, -30, Some("second"), SecurityType::Wpa2),
            (4, -45, Some("middle"), SecurityType::Wpa2),
        ]);

        let report = AnalysisReporter::new().analyze(&result, false);
        let order: Vec<_> = report.top_devices.iter().map(|d| d.display_ssid()).collect();
        assert_eq!(order, ["first", "second", "middle", "weak"]);
    }

    #[test]
    fn test_top_n_limit() {
        let entries: Vec<_> = (0..8)
            .map(|i| (1 + i as u32, -80 + i * 5, Some("net"), SecurityType::Open))
            .collect();
        let report = AnalysisReporter::new().analyze(&scan(&entries), false);
        assert_eq!(report.top_devices.len(), DEFAULT_TOP_N);
        assert_eq!(report.top_devices[0].strength_dbm, -45);

        let report = AnalysisReporter::new().with_top_n(2).analyze(&scan(&entries), false);
        assert_eq!(report.top_devices.len(), 2);
    }

    #[test]
    fn test_security_counts_first_seen_order() {
        let result = scan(&[
            (1, -50, None, SecurityType::Wpa2),
            (6, -60, None, SecurityType::Open),
            (11, -70, None, SecurityType::Wpa2),
        ]);

        let report = AnalysisReporter::new().analyze(&result, false);
        let counts: Vec<_> = report
            .security_counts
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        assert_eq!(counts, [("WPA2", 2), ("Open", 1)]);

        let json = report.to_json().unwrap();
        assert!(json.find("\"WPA2\": 2").unwrap() < json.find("\"Open\": 1").unwrap());
    }

    #[test]
    fn test_unknown_security_grouped() {
        let result = scan(&[
            (1, -50, None, SecurityType::Unknown),
            (6, -60, None, SecurityType::Wep),
            (7, -61, None, SecurityType::Unknown),
        ]);
        let report = AnalysisReporter::new().analyze(&result, false);
        assert_eq!(report.security_counts[&SecurityType::Unknown], 2);
        assert_eq!(report.security_counts.get_index(0).unwrap().0, &SecurityType::Unknown);
    }

    #[test]
    fn test_channel_strength_and_visibility() {
        let result = scan(&[
            (11, -40, Some("Guest"), SecurityType::Wpa3),
            (1, -90, None, SecurityType::Open),
            (6, -21, Some("Hidden"), SecurityType::Wpa2),
            (1, -55, Some("Hidden_Network"), SecurityType::Wpa2),
        ]);

        let report = AnalysisReporter::new().analyze(&result, true);
        assert_eq!(report.active_channels, [1, 6, 11]);
        assert_eq!(report.strength_range, Some((-90, -21)));
        assert_eq!(report.display_mean, -51.5);
        assert_eq!(report.visible_networks, 2);
        assert_eq!(report.hidden_networks, 2);
        assert!(report.plots.is_some());

        let text = report.to_text();
        assert!(text.contains("Channels with Activity:  [1, 6, 11]"));
        assert!(text.contains("Average Signal Strength: -51.5 dBm"));
        assert!(text.contains("1. Hidden - -21 dBm (Channel 6)"));
    }

    #[test]
    fn test_analysis_does_not_mutate_scan() {
        let result = scan(&[
            (3, -70, None, SecurityType::Wpa2),
            (2, -20, None, SecurityType::Wpa2),
        ]);
        let before = result.clone();
        let _ = AnalysisReporter::new().analyze(&result, true);
        assert_eq!(result, before);
    }
}
