//! Live scan timeline.
//!
//! Collects a copy of every sighting as it is reported during a scan and
//! renders strength over time plus the channel distribution once the scan
//! ends.

use crate::analysis::render::normalized_strength;
use crate::types::DeviceSighting;
use serde::Serialize;
use std::collections::BTreeMap;

/// One entry of the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// Seconds since the scan started
    pub elapsed_secs: f64,
    pub strength_dbm: i32,
    pub channel: u32,
    pub ssid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanTimeline {
    points: Vec<TimelinePoint>,
}

impl ScanTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, elapsed_secs: f64, sighting: &DeviceSighting) {
        self.points.push(TimelinePoint {
            elapsed_secs,
            strength_dbm: sighting.strength_dbm,
            channel: sighting.channel,
            ssid: sighting.ssid.clone(),
        });
    }

    pub fn points(&self) -> &[TimelinePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Strength-over-time strip and channel histogram
    pub fn to_ascii(&self, width: usize) -> String {
        let width = width.max(20);
        let mut output = String::new();

        output.push_str("Signal Strength Over Time\n");
        output.push_str(&"─".repeat(width));
        output.push('\n');

        if self.points.is_empty() {
            output.push_str("  No signals collected\n");
            return output;
        }

        // Keep the most recent readings when there are more than fit
        let chars = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
        let start = self.points.len().saturating_sub(width);
        for point in &self.points[start..] {
            let t = normalized_strength(point.strength_dbm as f64);
            let idx = ((t * (chars.len() - 1) as f64).round() as usize).min(chars.len() - 1);
            output.push(chars[idx]);
        }
        output.push('\n');

        let first = self.points[start].elapsed_secs;
        let last = self.points[self.points.len() - 1].elapsed_secs;
        output.push_str(&format!("{:.1}s .. {:.1}s  (-90 dBm ▁ .. █ -20 dBm)\n", first, last));

        output.push_str("\nChannel Distribution\n");
        output.push_str(&"─".repeat(width));
        output.push('\n');

        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for point in &self.points {
            *counts.entry(point.channel).or_insert(0) += 1;
        }
        let max = counts.values().copied().max().unwrap_or(1);
        let bar_width = width.saturating_sub(14).max(5);
        for (channel, count) in counts {
            output.push_str(&format!(
                "{:>4} │{} {}\n",
                channel,
                "█".repeat(count * bar_width / max),
                count
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Band, SecurityType};
    use chrono::NaiveDate;

    fn sighting(channel: u32, strength_dbm: i32) -> DeviceSighting {
        let seen = NaiveDate::from_ymd_opt(2024, 5, 5)
            .unwrap()
            .and_hms_opt(5, 5, 5)
            .unwrap();
        DeviceSighting {
            channel,
            strength_dbm,
            ssid: Some("AndroidAP".to_string()),
            band: Band::TwoPointFourGhz,
            security: SecurityType::Wpa2,
            first_seen: seen,
            last_seen: seen,
        }
    }

    #[test]
    fn test_timeline_records_copies() {
        let mut timeline = ScanTimeline::new();
        timeline.record(0.5, &sighting(6, -90));
        timeline.record(1.0, &sighting(6, -20));
        timeline.record(3.5, &sighting(11, -55));

        assert_eq!(timeline.len(), 3);
        assert_eq!(timeline.points()[2].channel, 11);
        assert_eq!(timeline.points()[0].ssid.as_deref(), Some("AndroidAP"));

        let text = timeline.to_ascii(40);
        assert!(text.contains("▁█"));
        assert!(text.contains("0.5s .. 3.5s"));
        assert!(text.contains("   6 │"));
    }

    #[test]
    fn test_empty_timeline() {
        let text = ScanTimeline::new().to_ascii(40);
        assert!(text.contains("No signals collected"));
    }
}
