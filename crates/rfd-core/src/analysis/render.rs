//! Plot Rendering
//!
//! Draws a [`PlotSet`] either as ASCII charts for the terminal or, with the
//! `image` feature, as two PNG files:
//!
//! ```text
//! rf_analysis_<stamp>.png          rf_details_<stamp>.png
//! ┌──────────────┬──────────────┐  ┌──────────────┬──────────────┐
//! │ channel bars │ strength hist│  │ channel      │ visibility   │
//! ├──────────────┼──────────────┤  │ heatmap      │ pie          │
//! │ ch vs dBm    │ security pie │  └──────────────┴──────────────┘
//! └──────────────┴──────────────┘
//! ```
//!
//! Without the feature [`render_png`] returns
//! [`crate::error::RfError::RenderingUnavailable`]; the numbers in the plot set are
//! unaffected.

use crate::analysis::plots::PlotSet;
use crate::error::RfResult;
use crate::types::{MAX_STRENGTH_DBM, MIN_STRENGTH_DBM};
use std::path::{Path, PathBuf};

/// Colormap for strength-coloured plot elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Viridis (perceptually uniform, colorblind-friendly)
    #[default]
    Viridis,
    /// Red through yellow to green
    RedYellowGreen,
    /// Grayscale (simple black to white)
    Grayscale,
}

impl Colormap {
    /// Map normalized value (0-1) to RGB color
    pub fn map(&self, value: f64) -> [u8; 3] {
        let t = value.clamp(0.0, 1.0);

        match self {
            Colormap::Viridis => Self::viridis(t),
            Colormap::RedYellowGreen => {
                if t < 0.5 {
                    [215, (48.0 + t * 2.0 * 207.0) as u8, 39]
                } else {
                    let s = (t - 0.5) * 2.0;
                    [(255.0 - s * 229.0) as u8, (255.0 - s * 103.0) as u8, 80]
                }
            }
            Colormap::Grayscale => {
                let v = (t * 255.0) as u8;
                [v, v, v]
            }
        }
    }

    /// Parse colormap from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viridis" => Some(Colormap::Viridis),
            "rdylgn" | "red-yellow-green" | "traffic" => Some(Colormap::RedYellowGreen),
            "grayscale" | "gray" | "grey" => Some(Colormap::Grayscale),
            _ => None,
        }
    }

    // Polynomial approximation of matplotlib's viridis
    fn viridis(t: f64) -> [u8; 3] {
        let r = (0.267 + t * (0.329 + t * (1.451 + t * (-1.808 + t * 0.758)))).clamp(0.0, 1.0);
        let g = (0.004 + t * (1.513 + t * (-0.838 + t * (0.731 - t * 0.466)))).clamp(0.0, 1.0);
        let b = (0.329 + t * (1.442 + t * (-2.642 + t * (1.963 - t * 0.440)))).clamp(0.0, 1.0);
        [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
    }
}

/// Position of a strength within [-90, -20], 0 = weakest, 1 = strongest
pub fn normalized_strength(strength_dbm: f64) -> f64 {
    let range = (MAX_STRENGTH_DBM - MIN_STRENGTH_DBM) as f64;
    ((strength_dbm - MIN_STRENGTH_DBM as f64) / range).clamp(0.0, 1.0)
}

/// Output paths for the overview and detail images
pub fn plot_paths(dir: &Path, stamp: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("rf_analysis_{}.png", stamp)),
        dir.join(format!("rf_details_{}.png", stamp)),
    )
}

const SHADES: [char; 5] = [' ', '░', '▒', '▓', '█'];

fn section(output: &mut String, title: &str, width: usize) {
    output.push_str(title);
    output.push('\n');
    output.push_str(&"─".repeat(width));
    output.push('\n');
}

/// Horizontal bar chart, bars scaled to the largest value
fn bar_rows(output: &mut String, rows: &[(String, usize, Option<f64>)], width: usize) {
    let label_width = rows.iter().map(|(l, _, _)| l.chars().count()).max().unwrap_or(0);
    let max = rows.iter().map(|(_, v, _)| *v).max().unwrap_or(0).max(1);
    let bar_width = width.saturating_sub(label_width + 16).max(10);

    for (label, value, percent) in rows {
        let len = value * bar_width / max;
        output.push_str(&format!(
            "{:>lw$} │{:<bw$} {}",
            label,
            "█".repeat(len),
            value,
            lw = label_width,
            bw = bar_width
        ));
        if let Some(p) = percent {
            output.push_str(&format!(" ({:.1}%)", p));
        }
        output.push('\n');
    }
}

impl PlotSet {
    /// Render every chart as text
    pub fn to_ascii(&self, width: usize) -> String {
        let width = width.max(40);
        let mut output = String::new();

        section(&mut output, "Channel Distribution", width);
        let rows: Vec<_> = self
            .channel_distribution
            .iter()
            .map(|c| (format!("ch {}", c.channel), c.count, None))
            .collect();
        bar_rows(&mut output, &rows, width);

        output.push('\n');
        section(&mut output, "Signal Strength Distribution (dBm)", width);
        let rows: Vec<_> = self
            .strength_histogram
            .labels()
            .into_iter()
            .zip(self.strength_histogram.counts.iter())
            .map(|(label, &count)| (label, count, None))
            .collect();
        bar_rows(&mut output, &rows, width);

        output.push('\n');
        section(&mut output, "Channel vs Signal Strength", width);
        output.push_str(&self.scatter_ascii());

        output.push('\n');
        section(&mut output, "Security Types Distribution", width);
        let rows: Vec<_> = self
            .security_share
            .iter()
            .map(|s| (s.label.clone(), s.count, Some(s.percent)))
            .collect();
        bar_rows(&mut output, &rows, width);

        output.push('\n');
        section(&mut output, "Channel Signal Strength Heatmap", width);
        for cell in &self.channel_heatmap {
            let t = normalized_strength(cell.mean_dbm);
            let level = (t * (SHADES.len() - 1) as f64).round() as usize;
            let shade = SHADES[level.min(SHADES.len() - 1)];
            output.push_str(&format!(
                "{:>4} {} {:>6.1} dBm\n",
                cell.channel,
                shade.to_string().repeat(4),
                cell.mean_dbm
            ));
        }

        output.push('\n');
        section(&mut output, "Network Visibility Distribution", width);
        let rows: Vec<_> = self
            .visibility
            .iter()
            .map(|s| (s.label.clone(), s.count, Some(s.percent)))
            .collect();
        bar_rows(&mut output, &rows, width);

        output
    }

    /// Density grid: rows are 10 dB strength bands, columns are channels
    fn scatter_ascii(&self) -> String {
        let mut channels: Vec<u32> = self.channel_vs_strength.iter().map(|p| p.channel).collect();
        channels.sort_unstable();
        channels.dedup();

        let bands: Vec<i32> = (MIN_STRENGTH_DBM..MAX_STRENGTH_DBM).step_by(10).collect();
        let mut output = String::new();

        for &lo in bands.iter().rev() {
            let hi = lo + 10;
            output.push_str(&format!("{:>4} │", hi));
            for &channel in &channels {
                let hits = self
                    .channel_vs_strength
                    .iter()
                    .filter(|p| p.channel == channel)
                    .filter(|p| {
                        p.strength_dbm >= lo
                            && (p.strength_dbm < hi || hi == MAX_STRENGTH_DBM)
                    })
                    .count();
                let shade = SHADES[hits.min(SHADES.len() - 1)];
                output.push_str(&format!("{:^4}", shade));
            }
            output.push('\n');
        }

        output.push_str("     └");
        output.push_str(&"────".repeat(channels.len()));
        output.push('\n');
        output.push_str("      ");
        for channel in &channels {
            output.push_str(&format!("{:^4}", channel));
        }
        output.push('\n');
        output
    }
}

/// Write the overview and detail PNGs into `dir`
#[cfg(feature = "image")]
pub fn render_png(
    plots: &PlotSet,
    dir: &Path,
    stamp: &str,
    colormap: Colormap,
) -> RfResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let (overview_path, details_path) = plot_paths(dir, stamp);

    let mut overview = png::Canvas::new(2 * png::PANEL_W, 2 * png::PANEL_H);
    overview.channel_bars(0, 0, plots, colormap);
    overview.strength_histogram(png::PANEL_W, 0, plots);
    overview.scatter(0, png::PANEL_H, plots, colormap);
    overview.pie(png::PANEL_W, png::PANEL_H, &plots.security_share, &png::SECURITY_COLORS);
    overview.write(&overview_path)?;
    tracing::info!("Analysis plot saved: {:?}", overview_path);

    let mut details = png::Canvas::new(2 * png::PANEL_W, png::PANEL_H);
    details.heatmap(0, 0, plots, colormap);
    details.pie(png::PANEL_W, 0, &plots.visibility, &png::VISIBILITY_COLORS);
    details.write(&details_path)?;
    tracing::info!("Detailed plot saved: {:?}", details_path);

    Ok(vec![overview_path, details_path])
}

/// Write the overview and detail PNGs into `dir`
#[cfg(not(feature = "image"))]
pub fn render_png(
    _plots: &PlotSet,
    _dir: &Path,
    _stamp: &str,
    _colormap: Colormap,
) -> RfResult<Vec<PathBuf>> {
    Err(crate::error::RfError::RenderingUnavailable(
        "PNG output requires the 'image' feature".to_string(),
    ))
}

#[cfg(feature = "image")]
mod png {
    use super::{normalized_strength, Colormap};
    use crate::analysis::plots::{PlotSet, Share};
    use crate::error::{RfError, RfResult};
    use crate::types::{MAX_STRENGTH_DBM, MIN_STRENGTH_DBM};
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageBuffer, ImageEncoder, Rgb, RgbImage};
    use std::path::Path;

    pub const PANEL_W: u32 = 480;
    pub const PANEL_H: u32 = 360;
    const MARGIN: u32 = 30;

    const AXIS: [u8; 3] = [120, 120, 120];
    const EDGE: [u8; 3] = [0, 0, 0];
    const HIST_FILL: [u8; 3] = [240, 128, 128];

    pub const SECURITY_COLORS: [[u8; 3]; 5] = [
        [0xff, 0x99, 0x99],
        [0x66, 0xb3, 0xff],
        [0x99, 0xff, 0x99],
        [0xff, 0xcc, 0x99],
        [0xff, 0x99, 0xcc],
    ];
    pub const VISIBILITY_COLORS: [[u8; 3]; 2] = [[0x4c, 0xaf, 0x50], [0xff, 0x98, 0x00]];

    pub struct Canvas {
        img: RgbImage,
    }

    impl Canvas {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                img: ImageBuffer::from_pixel(width, height, Rgb([255, 255, 255])),
            }
        }

        fn put(&mut self, x: u32, y: u32, color: [u8; 3]) {
            if x < self.img.width() && y < self.img.height() {
                self.img.put_pixel(x, y, Rgb(color));
            }
        }

        fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]) {
            for y in y0..y1 {
                for x in x0..x1 {
                    self.put(x, y, color);
                }
            }
        }

        fn outline_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]) {
            if x1 <= x0 || y1 <= y0 {
                return;
            }
            for x in x0..x1 {
                self.put(x, y0, color);
                self.put(x, y1 - 1, color);
            }
            for y in y0..y1 {
                self.put(x0, y, color);
                self.put(x1 - 1, y, color);
            }
        }

        /// Plot area of a panel: (left, top, right, bottom)
        fn area(ox: u32, oy: u32) -> (u32, u32, u32, u32) {
            (ox + MARGIN, oy + MARGIN, ox + PANEL_W - MARGIN, oy + PANEL_H - MARGIN)
        }

        fn axes(&mut self, ox: u32, oy: u32) {
            let (left, top, right, bottom) = Self::area(ox, oy);
            for x in left..=right {
                self.put(x, bottom, AXIS);
            }
            for y in top..=bottom {
                self.put(left, y, AXIS);
            }
        }

        /// Vertical bars, heights relative to the tallest
        fn bars(&mut self, ox: u32, oy: u32, values: &[usize], color: impl Fn(usize) -> [u8; 3]) {
            self.axes(ox, oy);
            if values.is_empty() {
                return;
            }
            let (left, top, right, bottom) = Self::area(ox, oy);
            let max = values.iter().copied().max().unwrap_or(1).max(1);
            let slot = (right - left) / values.len() as u32;
            let gap = (slot / 6).max(1);

            for (i, &value) in values.iter().enumerate() {
                let height = (value as u64 * (bottom - top) as u64 / max as u64) as u32;
                let x0 = left + i as u32 * slot + gap;
                let x1 = left + (i as u32 + 1) * slot - gap;
                let y0 = bottom - height;
                self.fill_rect(x0, y0, x1, bottom, color(i));
                self.outline_rect(x0, y0, x1, bottom, EDGE);
            }
        }

        pub fn channel_bars(&mut self, ox: u32, oy: u32, plots: &PlotSet, colormap: Colormap) {
            let values: Vec<usize> = plots.channel_distribution.iter().map(|c| c.count).collect();
            let n = values.len().max(2) - 1;
            self.bars(ox, oy, &values, |i| colormap.map(i as f64 / n as f64));
        }

        pub fn strength_histogram(&mut self, ox: u32, oy: u32, plots: &PlotSet) {
            self.bars(ox, oy, &plots.strength_histogram.counts, |_| HIST_FILL);
        }

        pub fn scatter(&mut self, ox: u32, oy: u32, plots: &PlotSet, colormap: Colormap) {
            self.axes(ox, oy);
            let points = &plots.channel_vs_strength;
            if points.is_empty() {
                return;
            }
            let (left, top, right, bottom) = Self::area(ox, oy);
            let min_ch = points.iter().map(|p| p.channel).min().unwrap_or(0) as f64 - 1.0;
            let max_ch = points.iter().map(|p| p.channel).max().unwrap_or(0) as f64 + 1.0;
            let span_dbm = (MAX_STRENGTH_DBM - MIN_STRENGTH_DBM) as f64;

            for p in points {
                let fx = (p.channel as f64 - min_ch) / (max_ch - min_ch);
                let fy = (p.strength_dbm - MIN_STRENGTH_DBM) as f64 / span_dbm;
                let x = left + (fx * (right - left) as f64) as u32;
                let y = bottom - (fy.clamp(0.0, 1.0) * (bottom - top) as f64) as u32;
                let color = colormap.map(normalized_strength(p.strength_dbm as f64));
                self.fill_rect(x.saturating_sub(3), y.saturating_sub(3), x + 4, y + 4, color);
            }
        }

        pub fn heatmap(&mut self, ox: u32, oy: u32, plots: &PlotSet, colormap: Colormap) {
            let cells = &plots.channel_heatmap;
            if cells.is_empty() {
                return;
            }
            let (left, top, right, bottom) = Self::area(ox, oy);
            let strip_top = top + (bottom - top) / 3;
            let strip_bottom = bottom - (bottom - top) / 3;
            let cell_w = ((right - left) / cells.len() as u32).max(1);

            for (i, cell) in cells.iter().enumerate() {
                let x0 = left + i as u32 * cell_w;
                let color = colormap.map(normalized_strength(cell.mean_dbm));
                self.fill_rect(x0, strip_top, x0 + cell_w, strip_bottom, color);
            }
            let strip_right = left + cell_w * cells.len() as u32;
            self.outline_rect(left, strip_top, strip_right, strip_bottom, EDGE);
        }

        /// Pie starting at 12 o'clock, slices counter-clockwise
        pub fn pie(&mut self, ox: u32, oy: u32, slices: &[Share], colors: &[[u8; 3]]) {
            let total: usize = slices.iter().map(|s| s.count).sum();
            if total == 0 || colors.is_empty() {
                return;
            }
            let cx = (ox + PANEL_W / 2) as f64;
            let cy = (oy + PANEL_H / 2) as f64;
            let radius = (PANEL_H / 2 - MARGIN) as f64;

            let mut bounds = Vec::with_capacity(slices.len());
            let mut acc = 0.0;
            for slice in slices {
                acc += slice.count as f64 / total as f64;
                bounds.push(acc);
            }

            for y in (cy - radius) as u32..=(cy + radius) as u32 {
                for x in (cx - radius) as u32..=(cx + radius) as u32 {
                    let dx = x as f64 - cx;
                    let dy = cy - y as f64;
                    if dx * dx + dy * dy > radius * radius {
                        continue;
                    }
                    let degrees = (dy.atan2(dx).to_degrees() - 90.0).rem_euclid(360.0);
                    let frac = degrees / 360.0;
                    let idx = bounds.iter().position(|&b| frac < b).unwrap_or(slices.len() - 1);
                    self.put(x, y, colors[idx % colors.len()]);
                }
            }
        }

        pub fn write(&self, path: &Path) -> RfResult<()> {
            let mut buffer = Vec::new();
            let (width, height) = (self.img.width(), self.img.height());
            let encoder = PngEncoder::new(&mut buffer);
            encoder
                .write_image(&self.img, width, height, ExtendedColorType::Rgb8)
                .map_err(|e| RfError::Render(e.to_string()))?;
            std::fs::write(path, &buffer)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::plots::{
        ChannelCount, ChannelMean, Histogram, ScatterPoint, Share, STRENGTH_BUCKET_EDGES,
    };

    fn plots() -> PlotSet {
        PlotSet {
            channel_distribution: vec![
                ChannelCount { channel: 1, count: 3 },
                ChannelCount { channel: 6, count: 1 },
            ],
            strength_histogram: Histogram::from_values(
                &[-85, -25, -24, -61],
                &STRENGTH_BUCKET_EDGES,
            ),
            channel_vs_strength: vec![
                ScatterPoint { channel: 1, strength_dbm: -85 },
                ScatterPoint { channel: 1, strength_dbm: -25 },
                ScatterPoint { channel: 1, strength_dbm: -24 },
                ScatterPoint { channel: 6, strength_dbm: -61 },
            ],
            security_share: vec![Share {
                label: "WPA2".to_string(),
                count: 4,
                percent: 100.0,
            }],
            channel_heatmap: vec![
                ChannelMean { channel: 1, mean_dbm: -44.7 },
                ChannelMean { channel: 6, mean_dbm: -61.0 },
            ],
            visibility: vec![
                Share { label: "Visible Networks".to_string(), count: 4, percent: 100.0 },
                Share { label: "Hidden Networks".to_string(), count: 0, percent: 0.0 },
            ],
        }
    }

    #[test]
    fn test_colormap_range() {
        for cmap in [Colormap::Viridis, Colormap::RedYellowGreen, Colormap::Grayscale] {
            let _ = cmap.map(0.0);
            let _ = cmap.map(0.5);
            let _ = cmap.map(1.0);
            let _ = cmap.map(-1.0);
            let _ = cmap.map(2.0);
        }
        assert_eq!(Colormap::Grayscale.map(1.0), [255, 255, 255]);
        assert_eq!(Colormap::from_str("Traffic"), Some(Colormap::RedYellowGreen));
        assert_eq!(Colormap::from_str("gray"), Some(Colormap::Grayscale));
        assert_eq!(Colormap::from_str("jet"), None);
    }

    #[test]
    fn test_normalized_strength() {
        assert_eq!(normalized_strength(-90.0), 0.0);
        assert_eq!(normalized_strength(-20.0), 1.0);
        assert_eq!(normalized_strength(-55.0), 0.5);
        assert_eq!(normalized_strength(-120.0), 0.0);
    }

    #[test]
    fn test_ascii_sections() {
        let text = plots().to_ascii(80);
        assert!(text.contains("Channel Distribution"));
        assert!(text.contains("-30 to -20"));
        assert!(text.contains("WPA2"));
        assert!(text.contains("(100.0%)"));
        assert!(text.contains("-44.7 dBm"));
        assert!(text.contains("Hidden Networks"));
    }

    #[test]
    fn test_scatter_ascii_density() {
        let text = plots().scatter_ascii();
        let top = text.lines().next().unwrap();
        // two readings of channel 1 in the top band
        assert!(top.starts_with(" -20 │"));
        assert!(top.contains('▒'));
    }

    #[test]
    fn test_plot_paths() {
        let (a, b) = plot_paths(Path::new("analysis_plots"), "20240101_120000");
        assert_eq!(a, Path::new("analysis_plots/rf_analysis_20240101_120000.png"));
        assert_eq!(b, Path::new("analysis_plots/rf_details_20240101_120000.png"));
    }

    #[cfg(not(feature = "image"))]
    #[test]
    fn test_png_unavailable_without_feature() {
        use crate::error::RfError;

        let err = render_png(&plots(), Path::new("unused"), "stamp", Colormap::Viridis)
            .unwrap_err();
        assert!(matches!(err, RfError::RenderingUnavailable(_)));
    }

    #[cfg(feature = "image")]
    #[test]
    fn test_png_written() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = render_png(&plots(), temp_dir.path(), "stamp", Colormap::Viridis).unwrap();
        assert_eq!(paths.len(), 2);
        for path in paths {
            let bytes = std::fs::read(&path).unwrap();
            assert_eq!(&bytes[1..4], b"PNG");
        }
    }
}
