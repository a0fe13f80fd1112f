//! Off-target risk buckets.
//!
//! Buckets are handed out Low, Medium, High, Low, ... in row order. Nothing
//! about the guide sequence feeds into the label; it is a placeholder until a
//! genome-wide search is wired in.

use tracing::info;

use crate::models::{GuideCandidate, OffTargetRecord, OffTargetRisk};

/// Bases dropped from the PAM-proximal end before counting repeats.
const SEED_TRIM: usize = 2;

pub fn risk_for_row(row: usize) -> OffTargetRisk {
    OffTargetRisk::CYCLE[row % OffTargetRisk::CYCLE.len()]
}

/// Occurrences of `guide` minus its last two bases elsewhere in `bases`,
/// overlapping hits included and the guide's own site excluded.
pub fn in_sequence_repeats(guide: &str, bases: &str) -> usize {
    let probe = &guide.as_bytes()[..guide.len().saturating_sub(SEED_TRIM)];
    if probe.is_empty() {
        return 0;
    }
    let hits = bases
        .as_bytes()
        .windows(probe.len())
        .filter(|w| *w == probe)
        .count();
    hits.saturating_sub(1)
}

pub fn classify_off_targets(candidates: &[GuideCandidate], bases: &str) -> Vec<OffTargetRecord> {
    let records: Vec<OffTargetRecord> = candidates
        .iter()
        .enumerate()
        .map(|(row, c)| {
            let risk = risk_for_row(row);
            OffTargetRecord {
                sequence: c.sequence.clone(),
                location: c.location.clone(),
                risk,
                description: risk.description(),
                in_sequence_repeats: in_sequence_repeats(&c.sequence, bases),
            }
        })
        .collect();
    info!("Assigned off-target buckets to {} guides", records.len());
    records
}
