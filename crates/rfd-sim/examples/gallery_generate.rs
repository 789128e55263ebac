//! Gallery Image Generator
//!
//! Runs a short seeded scan over every band, saves it, and renders the
//! analysis charts into the gallery directory.
//!
//! Run with: cargo run --example gallery_generate -p rfd-sim --features image

use rfd_core::analysis::{render_png, AnalysisReporter, Colormap};
use rfd_core::error::RfError;
use rfd_core::types::ScanBand;
use rfd_sim::{ScanConfig, ScanSession};
use std::fs;
use std::path::Path;
use std::time::Duration;

const GALLERY_DIR: &str = "gallery";
const SIGHTINGS: usize = 120;

fn main() {
    println!("RF Detector Gallery Generator");
    println!("=============================\n");

    fs::create_dir_all(GALLERY_DIR).expect("Failed to create directory");

    let bands = [
        (ScanBand::TwoPointFourGhz, "band_2g", 1u64),
        (ScanBand::FiveGhz, "band_5g", 2),
        (ScanBand::All, "band_all", 3),
    ];

    for (band, name, seed) in bands {
        generate_band_gallery(band, name, seed);
    }

    println!("\nGallery generation complete!");
    println!("Images saved to: {}/", GALLERY_DIR);
}

fn generate_band_gallery(band: ScanBand, name: &str, seed: u64) {
    println!("Generating {} gallery...", band);

    // Zero delays; the observer ends the scan after a fixed number of sightings
    let mut session = ScanSession::new(ScanConfig::immediate().with_seed(seed));
    let stop = session.stop_token();
    let mut seen = 0;
    let result = session.run_scan_with(band, Duration::from_secs(60), |_| {
        seen += 1;
        if seen == SIGHTINGS {
            stop.stop();
        }
    });

    let json_path = format!("{}/{}_scan.json", GALLERY_DIR, name);
    result.save(Path::new(&json_path)).expect("Failed to save scan");
    println!("  {} sightings -> {}", result.devices().len(), json_path);

    let report = AnalysisReporter::new().analyze(&result, true);
    let Some(plots) = report.plots else {
        println!("  No data to plot");
        return;
    };

    let ascii_path = format!("{}/{}_charts.txt", GALLERY_DIR, name);
    fs::write(&ascii_path, plots.to_ascii(80)).expect("Failed to write charts");
    println!("  {}", ascii_path);

    for colormap in [Colormap::Viridis, Colormap::RedYellowGreen] {
        let stamp = format!("{}_{:?}", name, colormap).to_lowercase();
        match render_png(&plots, Path::new(GALLERY_DIR), &stamp, colormap) {
            Ok(paths) => {
                for path in paths {
                    println!("  {}", path.display());
                }
            }
            Err(RfError::RenderingUnavailable(msg)) => {
                println!("  {} (ASCII charts only)", msg);
                break;
            }
            Err(e) => panic!("Failed to render {}: {}", stamp, e),
        }
    }
}
