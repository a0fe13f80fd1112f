use tracing::{debug, info};

use crate::guide_design::pam::PamPattern;
use crate::guide_design::scoring::{composite_score, gc_content, mismatch_count};
use crate::models::{GuideCandidate, TargetSequence, GUIDE_LENGTH};

/// First `GUIDE_LENGTH` bases of the input, used as the fixed mismatch reference.
pub fn reference_window(bases: &str) -> &str {
    match bases.char_indices().nth(GUIDE_LENGTH) {
        Some((end, _)) => &bases[..end],
        None => bases,
    }
}

/// Scans `target` for `pam` and scores the 20-nt window in front of every hit
/// that starts at or after base 20. Efficiency is left at 0 for the estimator.
///
/// Positions in `location` count characters; `GuideCandidate::start` is the
/// byte offset of the window in `target.bases`.
pub fn extract_candidates(
    target: &TargetSequence,
    pam: &PamPattern,
    max_guides: Option<usize>,
) -> Vec<GuideCandidate> {
    let bases = target.bases.as_str();
    let sites = pam.sites(bases);
    info!("Found {} {} sites in `{}`", sites.len(), pam.motif(), target.id);

    let reference = reference_window(bases);
    let limit = max_guides.unwrap_or(usize::MAX);
    let offsets: Vec<usize> = bases.char_indices().map(|(i, _)| i).collect();

    let mut candidates = Vec::new();
    for site in sites {
        if candidates.len() >= limit {
            debug!("Reached the limit of {} guides", limit);
            break;
        }
        // Matches always begin on a character boundary.
        let hit = offsets.partition_point(|&offset| offset < site.start);
        if hit < GUIDE_LENGTH {
            debug!("PAM at base {} has no room for a full guide, skipping", hit + 1);
            continue;
        }

        let start = offsets[hit - GUIDE_LENGTH];
        let guide = &bases[start..site.start];
        let gc = gc_content(guide);
        let mismatches = mismatch_count(guide, reference);
        candidates.push(GuideCandidate {
            sequence: guide.to_string(),
            pam: bases[site].to_string(),
            location: format!("{}:{}-{}", target.id, hit - GUIDE_LENGTH + 1, hit),
            start,
            gc_content: gc,
            mismatches,
            score: composite_score(mismatches, gc),
            efficiency: 0.0,
        });
    }

    info!("Kept {} candidate guides", candidates.len());
    candidates
}
