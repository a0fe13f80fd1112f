//! Heuristic guide scoring.
//!
//! The composite score rewards GC content and penalises mismatches against a
//! fixed reference window:
//!
//! `score = clamp(100 - 15 * mismatches + 0.5 * gc_percent, 0, 100)`
//!
//! The weights are uncalibrated heuristics, kept as named constants so they
//! can be swapped out in one place.

use crate::helper_functions::round2;

pub const SCORE_BASE: f64 = 100.0;
pub const MISMATCH_PENALTY: f64 = 15.0;
pub const GC_WEIGHT: f64 = 0.5;

/// Percentage of G/C bases, rounded to two decimals. Empty input gives 0.
pub fn gc_content(sequence: &str) -> f64 {
    if sequence.is_empty() {
        return 0.0;
    }
    let gc = sequence
        .chars()
        .filter(|c| matches!(c.to_ascii_uppercase(), 'G' | 'C'))
        .count();
    round2(gc as f64 / sequence.chars().count() as f64 * 100.0)
}

/// Position-wise differences; bases past the end of the shorter sequence count as mismatches.
pub fn mismatch_count(guide: &str, reference: &str) -> usize {
    let differing = guide
        .chars()
        .zip(reference.chars())
        .filter(|(a, b)| a != b)
        .count();
    differing + guide.chars().count().abs_diff(reference.chars().count())
}

pub fn composite_score(mismatches: usize, gc_percent: f64) -> f64 {
    let raw = SCORE_BASE - MISMATCH_PENALTY * mismatches as f64 + GC_WEIGHT * gc_percent;
    round2(raw.clamp(0.0, 100.0))
}
