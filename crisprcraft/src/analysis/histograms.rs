//! Frequency-distribution plots for the candidate table.
//!
//! One PNG per metric: GC content, mismatches, efficiency and score.

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::{info, warn};

use crate::models::{GuideCandidate, GUIDE_LENGTH};

/// A metric to plot and the fixed axis range it lives in.
#[derive(Debug, Clone, Copy)]
pub struct HistogramSpec {
    pub file_name: &'static str,
    pub caption: &'static str,
    pub x_desc: &'static str,
    pub min: f64,
    pub max: f64,
    /// `None` uses the configured bin count.
    pub bins: Option<usize>,
    pub colour: RGBColor,
}

pub const GC_CONTENT: HistogramSpec = HistogramSpec {
    file_name: "gc_content_histogram.png",
    caption: "GC Content Distribution",
    x_desc: "GC content (%)",
    min: 0.0,
    max: 100.0,
    bins: None,
    colour: RGBColor(0, 122, 204),
};

pub const MISMATCHES: HistogramSpec = HistogramSpec {
    file_name: "mismatches_histogram.png",
    caption: "Mismatch Distribution",
    x_desc: "Mismatches vs reference window",
    min: 0.0,
    max: (GUIDE_LENGTH + 1) as f64,
    // one bar per integer count
    bins: Some(GUIDE_LENGTH + 1),
    colour: RGBColor(231, 76, 60),
};

pub const EFFICIENCY: HistogramSpec = HistogramSpec {
    file_name: "efficiency_histogram.png",
    caption: "On-target Efficiency Distribution",
    x_desc: "Efficiency",
    min: 0.0,
    max: 100.0,
    bins: None,
    colour: RGBColor(39, 174, 96),
};

pub const SCORE: HistogramSpec = HistogramSpec {
    file_name: "score_histogram.png",
    caption: "Composite Score Distribution",
    x_desc: "Score",
    min: 0.0,
    max: 100.0,
    bins: None,
    colour: RGBColor(142, 68, 173),
};

/// Counts values into `bin_count` equal-width bins over `[min, max]`.
/// Values at or past `max` land in the last bin, values below `min` in the first.
pub fn bin_values(values: &[f64], min: f64, max: f64, bin_count: usize) -> Vec<usize> {
    let mut bins = vec![0; bin_count];
    if bin_count == 0 || max <= min {
        return bins;
    }
    let bin_size = (max - min) / bin_count as f64;
    for &val in values {
        let idx = ((val - min) / bin_size).floor().max(0.0) as usize;
        bins[idx.min(bin_count - 1)] += 1;
    }
    bins
}

fn draw_histogram(
    output_path: &Path,
    spec: &HistogramSpec,
    values: &[f64],
    bin_count: usize,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>> {
    let bins = bin_values(values, spec.min, spec.max, bin_count);
    let bin_size = (spec.max - spec.min) / bin_count as f64;
    let max_bin_count = *bins.iter().max().unwrap_or(&0);

    let root_area = BitMapBackend::new(output_path, size).into_drawing_area();
    root_area.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root_area)
        .margin(25)
        .caption(spec.caption, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(spec.min..spec.max, 0f64..(max_bin_count as f64 + 1.0))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(spec.x_desc)
        .y_desc("Count")
        .draw()?;

    chart.draw_series(bins.iter().enumerate().map(|(i, &count)| {
        let x0 = spec.min + i as f64 * bin_size;
        let x1 = x0 + bin_size;
        Rectangle::new([(x0, 0.0), (x1, count as f64)], spec.colour.mix(0.7).filled())
    }))?;

    root_area.present()?;
    Ok(())
}

/// Renders all four histograms into `output_dir`. A plot that fails to render
/// is logged and skipped; the paths of the ones written are returned.
pub fn render_histograms(
    candidates: &[GuideCandidate],
    output_dir: &Path,
    default_bins: usize,
    size: (u32, u32),
) -> Vec<PathBuf> {
    if candidates.is_empty() {
        warn!("No candidates to plot");
        return Vec::new();
    }

    let metrics: [(HistogramSpec, Vec<f64>); 4] = [
        (GC_CONTENT, candidates.iter().map(|c| c.gc_content).collect()),
        (MISMATCHES, candidates.iter().map(|c| c.mismatches as f64).collect()),
        (EFFICIENCY, candidates.iter().map(|c| c.efficiency).collect()),
        (SCORE, candidates.iter().map(|c| c.score).collect()),
    ];

    let mut written = Vec::new();
    for (spec, values) in &metrics {
        let path = output_dir.join(spec.file_name);
        let bin_count = spec.bins.unwrap_or(default_bins).max(1);
        match draw_histogram(&path, spec, values, bin_count, size) {
            Ok(()) => {
                info!("Histogram saved to {}", path.display());
                written.push(path);
            }
            Err(e) => warn!("Could not render {}: {e}", spec.file_name),
        }
    }
    written
}
