//! Scan Analysis Module
//!
//! Statistics, groupings and charts over finished scans.
//!
//! ## Features
//!
//! - **Summary Statistics**: totals, extrema, truncated integer mean
//! - **Analysis Report**: channels, strength range, display mean, visibility,
//!   security breakdown, strongest devices
//! - **Plot Data**: channel/strength distributions, scatter, heatmap, shares
//! - **Rendering**: ASCII charts, PNG output with the `image` feature
//! - **Timeline**: live sightings collected during a scan
//!
//! ## Example
//!
//! ```rust,no_run
//! use rfd_core::analysis::AnalysisReporter;
//! use rfd_core::types::ScanResult;
//! use std::path::Path;
//!
//! let result = ScanResult::load(Path::new("scan_results.json")).unwrap();
//! let report = AnalysisReporter::new().analyze(&result, true);
//! println!("{}", report.to_text());
//! if let Some(plots) = &report.plots {
//!     println!("{}", plots.to_ascii(80));
//! }
//! ```

pub mod plots;
pub mod render;
pub mod report;
pub mod statistics;
pub mod timeline;

pub use plots::{Histogram, PlotSet, Share, STRENGTH_BUCKET_EDGES};
pub use render::{plot_paths, render_png, Colormap};
pub use report::{AnalysisReport, AnalysisReporter, DEFAULT_TOP_N, NO_DATA_NOTICE};
pub use statistics::{display_mean, summary_mean, ScanSummary};
pub use timeline::{ScanTimeline, TimelinePoint};
