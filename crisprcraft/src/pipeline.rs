//! One design run: read the sequence, scan and score, estimate efficiency,
//! bucket off-target risk, then write tables, plots and the PDF.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analysis::histograms::render_histograms;
use crate::analysis::off_target::classify_off_targets;
use crate::analysis::summary::{summarize, RunSummary, SummaryInput};
use crate::config::DesignerConfig;
use crate::data_handling::sequence_source::SequenceSource;
use crate::guide_design::candidates::extract_candidates;
use crate::guide_design::pam::PamPattern;
use crate::helper_functions::resolve_path;
use crate::prediction_tools::external_model::ExternalModel;
use crate::prediction_tools::features::extract_features;
use crate::prediction_tools::on_target::{estimate_efficiency, RandomFallback};
use crate::reporting::pdf_report::write_summary_pdf;
use crate::reporting::tables::{candidates_to_dataframe, write_candidates, write_off_targets};

pub struct DesignRequest {
    pub source: SequenceSource,
    pub pam: String,
    pub config: DesignerConfig,
    pub render_plots: bool,
    pub write_pdf: bool,
}

#[derive(Debug)]
pub enum DesignOutcome {
    /// The PAM never matched far enough into the sequence; nothing was written.
    NoCandidates { sequence_id: String, pam: String },
    Completed {
        summary: RunSummary,
        files: Vec<PathBuf>,
    },
}

pub fn run_design(request: DesignRequest) -> Result<DesignOutcome> {
    let DesignRequest {
        source,
        pam,
        config,
        render_plots,
        write_pdf,
    } = request;

    let target = source.load()?;
    let pam = PamPattern::compile(&pam)?;

    let mut candidates = extract_candidates(&target, &pam, config.max_guides);
    if candidates.is_empty() {
        warn!("No gRNAs found with PAM {} in `{}`", pam.motif(), target.id);
        return Ok(DesignOutcome::NoCandidates {
            sequence_id: target.id,
            pam: pam.motif().to_string(),
        });
    }

    let features = extract_features(&candidates, &target.bases);
    let mut fallback = RandomFallback::new(config.random_seed);
    let efficiency_source = match ExternalModel::from_config(&config.efficiency_model) {
        Ok(mut model) => estimate_efficiency(&mut candidates, &features, Ok(&mut model), &mut fallback),
        Err(e) => estimate_efficiency(&mut candidates, &features, Err(e), &mut fallback),
    };

    let off_targets = classify_off_targets(&candidates, &target.bases);

    let output_dir = &resolve_path(&config.output_dir);
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let table = candidates_to_dataframe(&candidates)?;
    let mut files = vec![
        write_candidates(&table, output_dir)?,
        write_off_targets(&off_targets, output_dir)?,
    ];

    let summary = summarize(SummaryInput {
        sequence_id: &target.id,
        sequence_length: target.bases.chars().count(),
        pam: pam.motif(),
        candidates: &table,
        off_targets: &off_targets,
        efficiency_source: &efficiency_source,
    })?;

    if render_plots {
        files.extend(render_histograms(
            &candidates,
            output_dir,
            config.histogram_bins,
            (config.plot_width, config.plot_height),
        ));
    }
    if write_pdf {
        files.push(write_summary_pdf(&summary, output_dir)?);
    }

    info!("Design run complete: {} candidates", summary.candidate_count);
    Ok(DesignOutcome::Completed { summary, files })
}
