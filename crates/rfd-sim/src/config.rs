//! Session and monitor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scan session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Pause after each per-channel read (emulated hardware latency)
    pub channel_delay: Duration,
    /// Pause after each sampling round
    pub round_delay: Duration,
    /// Upper bound on channels visited per round
    pub max_channels_per_round: usize,
    /// Fixed RNG seed for reproducible scans
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            channel_delay: Duration::from_millis(500),
            round_delay: Duration::from_secs(2),
            max_channels_per_round: 3,
            seed: None,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero delays, for tests and batch generation
    pub fn immediate() -> Self {
        Self {
            channel_delay: Duration::ZERO,
            round_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_channel_delay(mut self, delay: Duration) -> Self {
        self.channel_delay = delay;
        self
    }

    pub fn with_round_delay(mut self, delay: Duration) -> Self {
        self.round_delay = delay;
        self
    }

    /// At least one channel is always visited per round
    pub fn with_max_channels_per_round(mut self, max: usize) -> Self {
        self.max_channels_per_round = max.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Channel monitor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Time between activity samples
    pub tick_interval: Duration,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            seed: None,
        }
    }
}

impl MonitorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.channel_delay, Duration::from_millis(500));
        assert_eq!(config.round_delay, Duration::from_secs(2));
        assert_eq!(config.max_channels_per_round, 3);
        assert!(config.seed.is_none());

        let config = ScanConfig::immediate().with_max_channels_per_round(0).with_seed(7);
        assert_eq!(config.channel_delay, Duration::ZERO);
        assert_eq!(config.max_channels_per_round, 1);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_monitor_config_serde() {
        let config = MonitorConfig::new()
            .with_tick_interval(Duration::from_millis(250))
            .with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let back: MonitorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
