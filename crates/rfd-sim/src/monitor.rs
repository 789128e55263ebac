//! Single-channel activity monitor.

use crate::config::MonitorConfig;
use crate::generator::SightingGenerator;
use crate::stop::StopToken;
use rfd_core::error::{RfError, RfResult};
use rfd_core::types::{ActivitySample, Band, MonitorResult};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Fixed-rate sampler for one channel
#[derive(Debug)]
pub struct ChannelMonitor {
    config: MonitorConfig,
    generator: SightingGenerator,
    stop: StopToken,
}

impl Default for ChannelMonitor {
    fn default() -> Self {
        Self::new(MonitorConfig::default())
    }
}

impl ChannelMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_stop_token(config, StopToken::new())
    }

    pub fn with_stop_token(config: MonitorConfig, stop: StopToken) -> Self {
        let generator = SightingGenerator::from_seed_option(config.seed);
        Self {
            config,
            generator,
            stop,
        }
    }

    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    pub fn monitor_channel(&mut self, channel: u32, duration: Duration) -> RfResult<MonitorResult> {
        self.monitor_channel_with(channel, duration, |_| {})
    }

    /// Sample `channel` once per tick until `duration` elapses or the
    /// monitor is stopped, calling `on_sample` after each tick.
    ///
    /// Fails with [`RfError::InvalidChannel`] before sampling if the channel
    /// is not part of either band.
    pub fn monitor_channel_with<F>(
        &mut self,
        channel: u32,
        duration: Duration,
        mut on_sample: F,
    ) -> RfResult<MonitorResult>
    where
        F: FnMut(&ActivitySample),
    {
        let band = Band::for_channel(channel).ok_or(RfError::InvalidChannel(channel))?;
        info!(
            "Monitoring channel {} ({}) for {:.1}s",
            channel,
            band,
            duration.as_secs_f64()
        );

        let start = Instant::now();
        let mut activity = Vec::new();

        while start.elapsed() < duration && !self.stop.is_stopped() {
            let sample = self.generator.sample_activity();
            debug!("{} dBm, {} packets", sample.strength_dbm, sample.packet_count);
            activity.push(sample);
            if let Some(latest) = activity.last() {
                on_sample(latest);
            }

            self.stop.sleep(self.config.tick_interval);
        }

        info!("Collected {} samples on channel {}", activity.len(), channel);

        Ok(MonitorResult {
            channel,
            duration: duration.as_secs_f64(),
            activity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> MonitorConfig {
        MonitorConfig::new()
            .with_tick_interval(Duration::from_millis(20))
            .with_seed(4)
    }

    #[test]
    fn test_invalid_channel() {
        let mut monitor = ChannelMonitor::new(fast());
        let err = monitor.monitor_channel(14, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, RfError::InvalidChannel(14)));
    }

    #[test]
    fn test_one_sample_per_tick() {
        let mut monitor = ChannelMonitor::new(fast());
        let result = monitor.monitor_channel(6, Duration::from_millis(200)).unwrap();

        assert_eq!(result.channel, 6);
        assert_eq!(result.duration, 0.2);
        // 10 ticks nominal, allow for scheduler jitter
        assert!(result.activity.len() >= 3 && result.activity.len() <= 11);
        for sample in &result.activity {
            assert!((-90..=-20).contains(&sample.strength_dbm));
            assert!(sample.packet_count <= 1000);
        }
        assert!(result
            .activity
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[test]
    fn test_stop_from_observer() {
        let mut monitor = ChannelMonitor::new(fast());
        let stop = monitor.stop_token();
        let mut ticks = 0;
        let result = monitor
            .monitor_channel_with(149, Duration::from_secs(3600), |_| {
                ticks += 1;
                if ticks == 5 {
                    stop.stop();
                }
            })
            .unwrap();
        assert_eq!(result.activity.len(), 5);
    }
}
