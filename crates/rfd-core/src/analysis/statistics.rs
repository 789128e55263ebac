//! Scan Summary Statistics
//!
//! Totals, extrema and means over the sightings of a scan. Two mean
//! policies live here side by side:
//!
//! - [`summary_mean`]: integer mean truncated toward zero, stored in the
//!   scan summary
//! - [`display_mean`]: mean rounded to one decimal, shown by the reporter

use crate::types::DeviceSighting;
use serde::Serialize;
use std::collections::BTreeSet;

/// Integer mean of signal strengths, truncated toward zero
///
/// `[-90, -21]` has a mean of -55.5 and yields -55. Empty input yields 0.
pub fn summary_mean(strengths: &[i32]) -> i32 {
    if strengths.is_empty() {
        return 0;
    }
    let sum: i64 = strengths.iter().map(|&s| s as i64).sum();
    (sum / strengths.len() as i64) as i32
}

/// Mean of signal strengths rounded to one decimal place
pub fn display_mean(strengths: &[i32]) -> f64 {
    if strengths.is_empty() {
        return 0.0;
    }
    let sum: i64 = strengths.iter().map(|&s| s as i64).sum();
    let mean = sum as f64 / strengths.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Summary of a scan, derived from its device list
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    /// Number of sightings
    pub total_signals: usize,
    /// Truncated integer mean strength (dBm)
    pub avg_strength: i32,
    /// Strongest sighting (dBm)
    pub max_strength: i32,
    /// Weakest sighting (dBm)
    pub min_strength: i32,
    /// Distinct channels with at least one sighting
    pub channels: BTreeSet<u32>,
    /// Requested scan duration in seconds (0 when nothing was seen)
    pub duration: f64,
}

impl ScanSummary {
    /// Compute the summary for the given sightings
    pub fn compute(devices: &[DeviceSighting], duration: f64) -> Self {
        if devices.is_empty() {
            return Self::empty();
        }

        let strengths: Vec<i32> = devices.iter().map(|d| d.strength_dbm).collect();
        let max_strength = strengths.iter().copied().max().unwrap_or_default();
        let min_strength = strengths.iter().copied().min().unwrap_or_default();

        Self {
            total_signals: devices.len(),
            avg_strength: summary_mean(&strengths),
            max_strength,
            min_strength,
            channels: devices.iter().map(|d| d.channel).collect(),
            duration,
        }
    }

    /// Zeroed summary for a scan without sightings
    pub fn empty() -> Self {
        Self::default()
    }

    /// Format as the end-of-scan text block
    pub fn to_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str("SCAN SUMMARY\n");
        output.push_str(&"=".repeat(50));
        output.push('\n');

        output.push_str(&format!("Total signals detected: {}\n", self.total_signals));
        output.push_str(&format!("Scan duration: {}s\n", self.duration));
        output.push_str(&format!("Average signal strength: {} dBm\n", self.avg_strength));
        output.push_str(&format!("Strongest signal: {} dBm\n", self.max_strength));
        output.push_str(&format!("Weakest signal: {} dBm\n", self.min_strength));
        output.push_str(&format!("Unique channels: {}\n", self.channels.len()));

        output
    }
}
