//! Plot Data
//!
//! Aggregates behind the analysis charts: channel distribution, strength
//! histogram, channel-vs-strength scatter, security share, per-channel
//! heatmap and network visibility. These are data only; see
//! [`crate::analysis::render`] for ASCII and PNG output.

use crate::types::{DeviceSighting, SecurityType};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Fixed strength bucket edges (dBm) for the histogram
pub const STRENGTH_BUCKET_EDGES: [i32; 8] = [-90, -80, -70, -60, -50, -40, -30, -20];

/// Histogram over fixed edges
///
/// Buckets are half-open `[lo, hi)` except the last, which also includes
/// its upper edge. Values outside the edges are not counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    pub edges: Vec<i32>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn from_values(values: &[i32], edges: &[i32]) -> Self {
        let buckets = edges.len().saturating_sub(1);
        let mut counts = vec![0usize; buckets];

        for &value in values {
            for i in 0..buckets {
                let (lo, hi) = (edges[i], edges[i + 1]);
                let last = i + 1 == buckets;
                if value >= lo && (value < hi || (last && value == hi)) {
                    counts[i] += 1;
                    break;
                }
            }
        }

        Self {
            edges: edges.to_vec(),
            counts,
        }
    }

    /// Bucket labels such as "-90 to -80"
    pub fn labels(&self) -> Vec<String> {
        self.edges
            .windows(2)
            .map(|w| format!("{} to {}", w[0], w[1]))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Number of sightings on one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelCount {
    pub channel: u32,
    pub count: usize,
}

/// Average strength on one channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMean {
    pub channel: u32,
    pub mean_dbm: f64,
}

/// A single point of the channel-vs-strength scatter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub channel: u32,
    pub strength_dbm: i32,
}

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Percentage of the whole, 0-100
    pub percent: f64,
}

fn shares<'a>(entries: impl Iterator<Item = (&'a str, usize)>) -> Vec<Share> {
    let entries: Vec<(&str, usize)> = entries.collect();
    let total: usize = entries.iter().map(|(_, c)| c).sum();
    entries
        .into_iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            count,
            percent: if total > 0 {
                100.0 * count as f64 / total as f64
            } else {
                0.0
            },
        })
        .collect()
}

/// Everything the analysis plots are drawn from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotSet {
    /// Sightings per channel, ascending by channel
    pub channel_distribution: Vec<ChannelCount>,
    pub strength_histogram: Histogram,
    /// One point per sighting, detection order
    pub channel_vs_strength: Vec<ScatterPoint>,
    /// Security types in first-seen order
    pub security_share: Vec<Share>,
    /// Average strength per channel, ascending by channel
    pub channel_heatmap: Vec<ChannelMean>,
    /// Visible then hidden networks
    pub visibility: Vec<Share>,
}

impl PlotSet {
    pub fn compute(
        devices: &[DeviceSighting],
        security_counts: &IndexMap<SecurityType, usize>,
        visible: usize,
        hidden: usize,
    ) -> Self {
        let mut per_channel: BTreeMap<u32, Vec<i32>> = BTreeMap::new();
        for device in devices {
            per_channel
                .entry(device.channel)
                .or_default()
                .push(device.strength_dbm);
        }

        let channel_distribution = per_channel
            .iter()
            .map(|(&channel, strengths)| ChannelCount {
                channel,
                count: strengths.len(),
            })
            .collect();

        let channel_heatmap = per_channel
            .iter()
            .map(|(&channel, strengths)| ChannelMean {
                channel,
                mean_dbm: strengths.iter().map(|&s| s as f64).sum::<f64>() / strengths.len() as f64,
            })
            .collect();

        let strengths: Vec<i32> = devices.iter().map(|d| d.strength_dbm).collect();

        Self {
            channel_distribution,
            strength_histogram: Histogram::from_values(&strengths, &STRENGTH_BUCKET_EDGES),
            channel_vs_strength: devices
                .iter()
                .map(|d| ScatterPoint {
                    channel: d.channel,
                    strength_dbm: d.strength_dbm,
                })
                .collect(),
            security_share: shares(security_counts.iter().map(|(k, &v)| (k.as_str(), v))),
            channel_heatmap,
            visibility: shares(
                [("Visible Networks", visible), ("Hidden Networks", hidden)].into_iter(),
            ),
        }
    }
}
