//! # RF Signal Detector Core
//!
//! Data model, persistence and analysis for simulated WiFi scans. The
//! simulation itself (record generation, scan sessions, channel monitoring)
//! lives in `rfd-sim`; this crate holds what both the simulator and the
//! CLI agree on.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    ScanResult     ┌──────────────────┐
//! │   rfd-sim    │ ────────────────► │ AnalysisReporter │
//! │ session/mon. │        │          └──────────────────┘
//! └──────────────┘        ▼                   │
//!                   JSON (persist)            ▼
//!                                     report / PlotSet / PNG
//! ```

pub mod analysis;
pub mod error;
pub mod persist;
pub mod types;

pub use error::{RfError, RfResult};
pub use types::{
    ActivitySample, Band, DeviceSighting, MonitorResult, ScanBand, ScanInfo, ScanResult,
    SecurityType,
};
