//! Timed scan sessions.
//!
//! A session repeatedly samples a small random subset of the band's channels
//! until its time budget runs out or its [`StopToken`] is set. Sightings are
//! handed to an optional observer as they are produced; the summary is
//! computed once the loop exits.

use crate::config::ScanConfig;
use crate::generator::SightingGenerator;
use crate::stop::StopToken;
use chrono::Local;
use rfd_core::types::{DeviceSighting, ScanBand, ScanInfo, ScanResult};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Scan session over one band selection
#[derive(Debug)]
pub struct ScanSession {
    config: ScanConfig,
    generator: SightingGenerator,
    stop: StopToken,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl ScanSession {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_stop_token(config, StopToken::new())
    }

    /// Session that stops when `stop` is set
    pub fn with_stop_token(mut config: ScanConfig, stop: StopToken) -> Self {
        // An empty round would spin without producing sightings
        config.max_channels_per_round = config.max_channels_per_round.max(1);
        let generator = SightingGenerator::from_seed_option(config.seed);
        Self {
            config,
            generator,
            stop,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Handle for stopping the session from elsewhere
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn run_scan(&mut self, band: ScanBand, duration: Duration) -> ScanResult {
        self.run_scan_with(band, duration, |_| {})
    }

    /// Run the scan, calling `on_sighting` after each new sighting
    pub fn run_scan_with<F>(
        &mut self,
        band: ScanBand,
        duration: Duration,
        mut on_sighting: F,
    ) -> ScanResult
    where
        F: FnMut(&DeviceSighting),
    {
        let channels = band.channels();
        let scan_info = ScanInfo {
            band,
            channels: channels.clone(),
            start_time: Local::now().naive_local(),
            duration_seconds: duration.as_secs_f64(),
        };

        info!(
            "Starting {} scan over {} channels for {:.1}s",
            band,
            channels.len(),
            duration.as_secs_f64()
        );

        let start = Instant::now();
        let mut devices: Vec<DeviceSighting> = Vec::new();
        let mut rounds = 0usize;

        'scan: while start.elapsed() < duration && !self.stop.is_stopped() {
            rounds += 1;
            let picked = self
                .generator
                .select_channels(&channels, self.config.max_channels_per_round);

            for channel in picked {
                if self.stop.is_stopped() {
                    break 'scan;
                }

                let sighting = self.generator.generate(channel, band.band_of(channel));
                debug!(
                    "ch {:>3} {:>4} dBm {}",
                    sighting.channel,
                    sighting.strength_dbm,
                    sighting.display_ssid()
                );
                devices.push(sighting);
                if let Some(latest) = devices.last() {
                    on_sighting(latest);
                }

                self.stop.sleep(self.config.channel_delay);
            }

            self.stop.sleep(self.config.round_delay);
        }

        let result = ScanResult::with_devices(scan_info, devices);
        info!(
            "Scan finished after {} rounds ({:.1}s): {} signals{}",
            rounds,
            start.elapsed().as_secs_f64(),
            result.summary().total_signals,
            if self.stop.is_stopped() { ", stopped early" } else { "" }
        );
        result
    }
}
