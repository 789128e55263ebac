//! # RF Signal Detector Simulation
//!
//! Synthetic WiFi scanning: a record generator, timed scan sessions over a
//! band selection, and a fixed-rate single-channel monitor. Both timed loops
//! share the same cooperative stop mechanism.
//!
//! ## Architecture
//!
//! ```text
//!        StopToken (Arc<AtomicBool>)
//!          │                  │
//!          ▼                  ▼
//! ┌─────────────────┐  ┌────────────────┐
//! │   ScanSession   │  │ ChannelMonitor │
//! │ rounds × chans  │  │  one per tick  │
//! └─────────────────┘  └────────────────┘
//!          │                  │
//!          └──► SightingGenerator (StdRng)
//!          │                  │
//!          ▼                  ▼
//!     ScanResult         MonitorResult
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rfd_sim::{ScanConfig, ScanSession};
//! use rfd_core::types::ScanBand;
//! use std::time::Duration;
//!
//! let band: ScanBand = "2.4G".parse().unwrap();
//! let mut session = ScanSession::new(ScanConfig::default());
//! let result = session.run_scan_with(band, Duration::from_secs(10), |s| {
//!     println!("{:>4} {:>4} dBm {}", s.channel, s.strength_dbm, s.display_ssid());
//! });
//! println!("{}", result.summary().to_text());
//! ```

pub mod config;
pub mod generator;
pub mod monitor;
pub mod session;
pub mod stop;

// Re-exports
pub use config::{MonitorConfig, ScanConfig};
pub use generator::{SightingGenerator, SSID_CANDIDATES};
pub use monitor::ChannelMonitor;
pub use session::ScanSession;
pub use stop::StopToken;
