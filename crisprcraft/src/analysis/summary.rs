use std::collections::HashMap;

use polars::prelude::*;

use crate::helper_functions::round2;
use crate::models::{OffTargetRecord, OffTargetRisk};
use crate::prediction_tools::on_target::EfficiencySource;

/// Aggregate numbers reported on stdout and in the PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub sequence_id: String,
    pub sequence_length: usize,
    pub pam: String,
    pub candidate_count: usize,
    pub mean_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub mean_gc_content: f64,
    pub mean_efficiency: f64,
    pub efficiency_source: EfficiencySource,
    pub risk_counts: Vec<(OffTargetRisk, usize)>,
}

fn column_stats(df: &DataFrame, name: &str) -> PolarsResult<(f64, f64, f64)> {
    let values = df.column(name)?.cast(&DataType::Float64)?;
    let values = values.f64()?;
    Ok((
        values.mean().map(round2).unwrap_or(0.0),
        values.min().unwrap_or(0.0),
        values.max().unwrap_or(0.0),
    ))
}

pub struct SummaryInput<'a> {
    pub sequence_id: &'a str,
    pub sequence_length: usize,
    pub pam: &'a str,
    pub candidates: &'a DataFrame,
    pub off_targets: &'a [OffTargetRecord],
    pub efficiency_source: &'a EfficiencySource,
}

pub fn summarize(input: SummaryInput<'_>) -> PolarsResult<RunSummary> {
    let (mean_score, min_score, max_score) = column_stats(input.candidates, "score")?;
    let (mean_gc_content, _, _) = column_stats(input.candidates, "gc_content")?;
    let (mean_efficiency, _, _) = column_stats(input.candidates, "efficiency")?;

    let mut tally: HashMap<OffTargetRisk, usize> = HashMap::new();
    for record in input.off_targets {
        *tally.entry(record.risk).or_default() += 1;
    }
    let risk_counts = OffTargetRisk::CYCLE
        .iter()
        .map(|risk| (*risk, tally.get(risk).copied().unwrap_or(0)))
        .collect();

    Ok(RunSummary {
        sequence_id: input.sequence_id.to_string(),
        sequence_length: input.sequence_length,
        pam: input.pam.to_string(),
        candidate_count: input.candidates.height(),
        mean_score,
        min_score,
        max_score,
        mean_gc_content,
        mean_efficiency,
        efficiency_source: input.efficiency_source.clone(),
        risk_counts,
    })
}

impl RunSummary {
    /// Plain text lines shared by the console report and the PDF.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Sequence          : {} ({} bp)", self.sequence_id, self.sequence_length),
            format!("PAM               : {}", self.pam),
            format!("Candidate gRNAs   : {}", self.candidate_count),
            format!("Mean score        : {:.2}", self.mean_score),
            format!("Score range       : {:.2} - {:.2}", self.min_score, self.max_score),
            format!("Mean GC content   : {:.2}%", self.mean_gc_content),
            format!("Mean efficiency   : {:.2}", self.mean_efficiency),
            format!("Efficiency source : {}", self.efficiency_source),
        ];
        let risks: Vec<String> = self
            .risk_counts
            .iter()
            .map(|(risk, n)| format!("{risk} {n}"))
            .collect();
        lines.push(format!("Off-target buckets: {} (placeholder)", risks.join(", ")));
        lines
    }
}
