//! RF Signal Detector Command-Line Interface
//!
//! This CLI provides tools for:
//! - Scanning the 2.4 GHz / 5 GHz bands for (simulated) WiFi networks
//! - Monitoring activity on a single channel
//! - Analyzing saved scan results, with ASCII and PNG charts
//!
//! PNG output requires the `image` feature.

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use rfd_core::analysis::{render_png, AnalysisReporter, Colormap, PlotSet, ScanTimeline};
use rfd_core::error::RfError;
use rfd_core::types::{Band, DeviceSighting, ScanBand, ScanResult};
use rfd_sim::{ChannelMonitor, MonitorConfig, ScanConfig, ScanSession, StopToken};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Exit status after a run cut short by Ctrl+C
const EXIT_INTERRUPTED: i32 = 130;

/// Capacity of the live visualization feed
const VISUALIZE_QUEUE: usize = 256;

const EXAMPLES: &str = "\
Examples:
  rf-detector scan                          # Basic scan
  rf-detector scan -b 2.4G                  # Scan 2.4GHz band
  rf-detector scan -b 5G -t 30              # Scan 5GHz for 30 seconds
  rf-detector monitor -c 6 -o output.json   # Monitor channel 6 and save results
  rf-detector analyze -f scan_results.json  # Analyze previous scan";

#[derive(Parser)]
#[command(name = "rf-detector")]
#[command(author, version, long_about = None)]
#[command(about = "RF Signal Detector - Wireless Signal Analysis")]
#[command(after_help = EXAMPLES)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for RF signals
    Scan {
        /// Frequency band to scan (2.4G, 5G, all)
        #[arg(short, long, default_value = "2.4G")]
        band: String,

        /// Scan duration in seconds
        #[arg(short, long, default_value = "60")]
        time: u64,

        /// Output file for results
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show a signal timeline after the scan
        #[arg(short, long)]
        visualize: bool,

        /// Delay after each channel read in milliseconds
        #[arg(long, default_value = "500")]
        channel_delay_ms: u64,

        /// Delay between sampling rounds in milliseconds
        #[arg(long, default_value = "2000")]
        round_delay_ms: u64,

        /// Channels visited per round
        #[arg(long, default_value = "3")]
        max_channels: usize,

        /// RNG seed for a reproducible scan
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Monitor a specific channel
    Monitor {
        /// WiFi channel to monitor
        #[arg(short, long)]
        channel: u32,

        /// Monitoring duration in seconds
        #[arg(short, long, default_value = "300")]
        time: u64,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sampling interval in milliseconds
        #[arg(long, default_value = "1000")]
        interval_ms: u64,

        /// RNG seed for reproducible samples
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Analyze scan results
    Analyze {
        /// Scan results file
        #[arg(short, long)]
        file: PathBuf,

        /// Generate plots
        #[arg(short, long)]
        plot: bool,

        /// Number of strongest signals to list
        #[arg(long, default_value = "5")]
        top: usize,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        output_format: String,

        /// Colormap for PNG plots (viridis, rdylgn, grayscale)
        #[arg(long, default_value = "viridis")]
        colormap: String,

        /// Directory for PNG plots
        #[arg(long, default_value = "analysis_plots")]
        plot_dir: PathBuf,
    },

    /// Show the channel plan and center frequencies
    Info {
        /// Band to list (2.4G, 5G, all)
        #[arg(short, long, default_value = "all")]
        band: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Install the Ctrl+C handler and hand back the token it sets
fn install_stop_handler() -> Result<StopToken> {
    let stop = StopToken::new();
    let s = stop.clone();
    ctrlc::set_handler(move || {
        s.stop();
    })
    .context("Failed to set Ctrl+C handler")?;
    Ok(stop)
}

fn print_sighting(sighting: &DeviceSighting) {
    println!(
        "{:>4}  {:>4} dBm  {}",
        sighting.channel,
        sighting.strength_dbm,
        sighting.display_ssid()
    );
}

fn print_scan_summary(result: &ScanResult) {
    println!();
    print!("{}", result.summary().to_text());

    if !result.is_empty() {
        println!("\nTOP DEVICES:");
        for device in result.devices().iter().take(5) {
            println!("  {} - {} dBm", device.display_ssid(), device.strength_dbm);
        }
    }
}

/// Collects the observer feed into a timeline on its own thread
fn spawn_timeline_collector() -> (
    mpsc::SyncSender<(f64, DeviceSighting)>,
    thread::JoinHandle<ScanTimeline>,
) {
    let (tx, rx) = mpsc::sync_channel::<(f64, DeviceSighting)>(VISUALIZE_QUEUE);
    let handle = thread::spawn(move || {
        let mut timeline = ScanTimeline::new();
        for (elapsed, sighting) in rx {
            timeline.record(elapsed, &sighting);
        }
        timeline
    });
    (tx, handle)
}

/// Returns `false` if the scan was interrupted
#[allow(clippy::too_many_arguments)]
fn cmd_scan(
    band: String,
    time: u64,
    output: Option<PathBuf>,
    visualize: bool,
    channel_delay_ms: u64,
    round_delay_ms: u64,
    max_channels: usize,
    seed: Option<u64>,
) -> Result<bool> {
    let band: ScanBand = band.parse()?;

    let mut config = ScanConfig::new()
        .with_channel_delay(Duration::from_millis(channel_delay_ms))
        .with_round_delay(Duration::from_millis(round_delay_ms))
        .with_max_channels_per_round(max_channels);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let stop = install_stop_handler()?;
    let mut session = ScanSession::with_stop_token(config, stop.clone());

    println!("[+] Starting RF scan on {} band for {} seconds...", band, time);
    println!("[+] Press Ctrl+C to stop\n");
    println!("CHAN  STRENGTH  SSID");
    println!("{}", "-".repeat(40));

    let collector = visualize.then(spawn_timeline_collector);
    let feed = collector.as_ref().map(|(tx, _)| tx.clone());
    let start = Instant::now();

    let result = session.run_scan_with(band, Duration::from_secs(time), move |sighting| {
        print_sighting(sighting);
        if let Some(tx) = &feed {
            if tx.send((start.elapsed().as_secs_f64(), sighting.clone())).is_err() {
                warn!("Timeline collector stopped early");
            }
        }
    });

    let interrupted = stop.is_stopped();
    if interrupted {
        println!("\n[!] Scan interrupted by user");
    }

    if let Some((tx, handle)) = collector {
        drop(tx);
        match handle.join() {
            Ok(timeline) => {
                println!();
                print!("{}", timeline.to_ascii(60));
            }
            Err(_) => warn!("Timeline collector panicked"),
        }
    }

    if let Some(path) = output {
        result
            .save(&path)
            .with_context(|| format!("Failed to save results to {:?}", path))?;
        println!("[+] Results saved to {}", path.display());
    }

    print_scan_summary(&result);
    Ok(!interrupted)
}

/// Returns `false` if monitoring was interrupted
fn cmd_monitor(
    channel: u32,
    time: u64,
    output: Option<PathBuf>,
    interval_ms: u64,
    seed: Option<u64>,
) -> Result<bool> {
    let mut config = MonitorConfig::new().with_tick_interval(Duration::from_millis(interval_ms));
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let stop = install_stop_handler()?;
    let mut monitor = ChannelMonitor::with_stop_token(config, stop.clone());

    println!("[+] Monitoring channel {} for {} seconds...", channel, time);
    println!("TIME      STRENGTH  PACKETS");
    println!("{}", "-".repeat(30));

    let result = monitor.monitor_channel_with(channel, Duration::from_secs(time), |sample| {
        println!(
            "{}  {:>4} dBm  {:>7}",
            sample.timestamp.format("%H:%M:%S"),
            sample.strength_dbm,
            sample.packet_count
        );
    })?;

    let interrupted = stop.is_stopped();
    if interrupted {
        println!("\n[!] Monitoring interrupted by user");
    }
    println!("[+] Collected {} samples", result.activity.len());

    if let Some(path) = output {
        result
            .save(&path)
            .with_context(|| format!("Failed to save results to {:?}", path))?;
        println!("[+] Results saved to {}", path.display());
    }

    Ok(!interrupted)
}

fn cmd_analyze(
    file: PathBuf,
    plot: bool,
    top: usize,
    output_format: String,
    colormap: String,
    plot_dir: PathBuf,
) -> Result<()> {
    let colormap = match Colormap::from_str(&colormap) {
        Some(c) => c,
        None => bail!("Invalid colormap: {}. Use viridis, rdylgn, or grayscale", colormap),
    };
    let json = match output_format.as_str() {
        "text" => false,
        "json" => true,
        other => bail!("Invalid output format: {}. Use text or json", other),
    };

    if !json {
        println!("[+] Analyzing results from {}...", file.display());
    }

    let result = ScanResult::load(&file).with_context(|| format!("Failed to load {:?}", file))?;
    info!("Loaded {} devices from {:?}", result.devices().len(), file);

    let report = AnalysisReporter::new().with_top_n(top).analyze(&result, plot);

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!();
        print!("{}", report.to_text());
    }

    let Some(plots) = &report.plots else {
        return Ok(());
    };

    if !json {
        println!();
        print!("{}", plots.to_ascii(70));
    }

    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    // Keep stdout a single JSON document in json mode
    if json {
        write_plots(plots, &plot_dir, &stamp, colormap, &mut io::stderr())
    } else {
        write_plots(plots, &plot_dir, &stamp, colormap, &mut io::stdout())
    }
}

/// Render the PNG plots, reporting each saved file on `status`
fn write_plots(
    plots: &PlotSet,
    plot_dir: &Path,
    stamp: &str,
    colormap: Colormap,
    status: &mut dyn Write,
) -> Result<()> {
    match render_png(plots, plot_dir, stamp, colormap) {
        Ok(paths) => {
            for path in paths {
                writeln!(status, "[+] Plot saved to {}", path.display())?;
            }
        }
        Err(RfError::RenderingUnavailable(msg)) => {
            writeln!(status, "[!] {}", msg)?;
        }
        Err(e) => return Err(e).context("Failed to render plots"),
    }

    Ok(())
}

fn print_band_plan(band: Band) {
    println!("{} band ({} channels)", band, band.channels().len());
    println!("{}", "-".repeat(30));
    for &channel in band.channels() {
        if let Some(mhz) = band.center_frequency_mhz(channel) {
            println!("  Channel {:>3}  {:>5} MHz", channel, mhz);
        }
    }
    println!();
}

fn cmd_info(band: String) -> Result<()> {
    let band: ScanBand = band.parse()?;

    println!("=== WiFi Channel Plan ===\n");
    match band {
        ScanBand::TwoPointFourGhz => print_band_plan(Band::TwoPointFourGhz),
        ScanBand::FiveGhz => print_band_plan(Band::FiveGhz),
        ScanBand::All => {
            print_band_plan(Band::TwoPointFourGhz);
            print_band_plan(Band::FiveGhz);
        }
    }

    let config = ScanConfig::default();
    println!("Default scan timing:");
    println!("  Channel delay:    {} ms", config.channel_delay.as_millis());
    println!("  Round delay:      {} ms", config.round_delay.as_millis());
    println!("  Channels / round: {}", config.max_channels_per_round);
    println!("  Strength range:   -90 to -20 dBm");

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let completed = match cli.command {
        Commands::Scan {
            band,
            time,
            output,
            visualize,
            channel_delay_ms,
            round_delay_ms,
            max_channels,
            seed,
        } => cmd_scan(
            band,
            time,
            output,
            visualize,
            channel_delay_ms,
            round_delay_ms,
            max_channels,
            seed,
        )?,
        Commands::Monitor {
            channel,
            time,
            output,
            interval_ms,
            seed,
        } => cmd_monitor(channel, time, output, interval_ms, seed)?,
        Commands::Analyze {
            file,
            plot,
            top,
            output_format,
            colormap,
            plot_dir,
        } => {
            cmd_analyze(file, plot, top, output_format, colormap, plot_dir)?;
            true
        }
        Commands::Info { band } => {
            cmd_info(band)?;
            true
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            true
        }
    };

    if !completed {
        std::process::exit(EXIT_INTERRUPTED);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["rf-detector", "-vv", "scan", "-v", "-b", "5G"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Scan {
                band,
                time,
                visualize,
                max_channels,
                ..
            } => {
                assert_eq!(band, "5G");
                assert_eq!(time, 60);
                assert!(visualize);
                assert_eq!(max_channels, 3);
            }
            _ => panic!("expected scan"),
        }
    }

    #[test]
    fn test_monitor_requires_channel() {
        assert!(Cli::try_parse_from(["rf-detector", "monitor"]).is_err());
        let cli = Cli::try_parse_from(["rf-detector", "monitor", "-c", "6"]).unwrap();
        match cli.command {
            Commands::Monitor { channel, time, .. } => {
                assert_eq!(channel, 6);
                assert_eq!(time, 300);
            }
            _ => panic!("expected monitor"),
        }
    }

    #[test]
    fn test_plot_status_goes_to_given_sink() {
        let mut session = ScanSession::new(ScanConfig::immediate().with_seed(5));
        let stop = session.stop_token();
        let mut count = 0;
        let result = session.run_scan_with(ScanBand::All, Duration::from_secs(60), |_| {
            count += 1;
            if count == 12 {
                stop.stop();
            }
        });
        let report = AnalysisReporter::new().analyze(&result, true);
        let plots = report.plots.unwrap();

        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut status = Vec::new();
        write_plots(&plots, temp_dir.path(), "20240101_000000", Colormap::Viridis, &mut status)
            .unwrap();

        let status = String::from_utf8(status).unwrap();
        assert!(status.starts_with("[+] Plot saved to") || status.starts_with("[!] "));
        assert!(!status.contains('{'));
    }

    #[test]
    fn test_invalid_band_rejected() {
        let err = cmd_info("6G".to_string()).unwrap_err();
        assert!(err.to_string().contains("Invalid band"));
    }
}
