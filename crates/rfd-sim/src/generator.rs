//! Synthetic sighting generator.
//!
//! Every draw is uniform and independent: strength over the full dBm range,
//! SSID from a fixed candidate list that includes hidden networks, and one of
//! the four advertised security types.

use chrono::{Local, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rfd_core::types::{
    ActivitySample, Band, DeviceSighting, SecurityType, MAX_PACKET_COUNT, MAX_STRENGTH_DBM,
    MIN_STRENGTH_DBM,
};

/// Network names a sighting can carry; `None` is a hidden network
pub const SSID_CANDIDATES: [Option<&str>; 12] = [
    Some("Home_Network"),
    Some("TP-Link_ABCD"),
    Some("AndroidAP"),
    Some("iPhone"),
    Some("XfinityWiFi"),
    Some("ATTWiFi"),
    Some("NETGEAR"),
    Some("Linksys"),
    Some("Hidden_Network"),
    Some("Public_WiFi"),
    Some("Guest"),
    None,
];

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Source of synthetic sightings and activity samples
#[derive(Debug)]
pub struct SightingGenerator {
    rng: StdRng,
}

impl Default for SightingGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SightingGenerator {
    /// Entropy-seeded generator
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible generator
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }

    fn strength(&mut self) -> i32 {
        self.rng.gen_range(MIN_STRENGTH_DBM..=MAX_STRENGTH_DBM)
    }

    /// One simulated device on `channel`, seen now
    pub fn generate(&mut self, channel: u32, band: Band) -> DeviceSighting {
        let strength_dbm = self.strength();
        let ssid = SSID_CANDIDATES
            .choose(&mut self.rng)
            .copied()
            .flatten()
            .map(str::to_string);
        let security = SecurityType::ADVERTISED
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(SecurityType::Unknown);
        let seen = now();

        DeviceSighting {
            channel,
            strength_dbm,
            ssid,
            band,
            security,
            first_seen: seen,
            last_seen: seen,
        }
    }

    /// Up to `max` distinct channels in random order
    pub fn select_channels(&mut self, channels: &[u32], max: usize) -> Vec<u32> {
        let count = max.min(channels.len());
        let mut picked: Vec<u32> = channels
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect();
        picked.shuffle(&mut self.rng);
        picked
    }

    /// One monitor tick's reading
    pub fn sample_activity(&mut self) -> ActivitySample {
        ActivitySample {
            timestamp: now(),
            strength_dbm: self.strength(),
            packet_count: self.rng.gen_range(0..=MAX_PACKET_COUNT),
        }
    }
}
