use polars::prelude::*;

use crate::models::GuideCandidate;

/// Bases taken on each side of guide+PAM for the 30-mer scoring context
/// (4 upstream, 3 downstream, as used by Rule Set 2 style models).
pub const CONTEXT_UPSTREAM: usize = 4;
pub const CONTEXT_DOWNSTREAM: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct GuideFeatures {
    pub guide: String,
    pub pam: String,
    /// `None` when the guide sits too close to either end of the input.
    pub context: Option<String>,
    pub gc_content: f64,
}

/// `CONTEXT_UPSTREAM` characters before the guide through `CONTEXT_DOWNSTREAM`
/// characters after its PAM, or `None` if either side runs off the sequence.
fn context_window(bases: &str, candidate: &GuideCandidate) -> Option<String> {
    let guide_end = candidate.start + candidate.sequence.len() + candidate.pam.len();
    let from = bases
        .get(..candidate.start)?
        .char_indices()
        .rev()
        .nth(CONTEXT_UPSTREAM - 1)?
        .0;
    let after = bases.get(guide_end..)?;
    let to = after
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(after.len()))
        .nth(CONTEXT_DOWNSTREAM)?;
    Some(bases[from..guide_end + to].to_string())
}

pub fn extract_features(candidates: &[GuideCandidate], bases: &str) -> Vec<GuideFeatures> {
    candidates
        .iter()
        .map(|c| GuideFeatures {
            guide: c.sequence.clone(),
            pam: c.pam.clone(),
            context: context_window(bases, c),
            gc_content: c.gc_content,
        })
        .collect()
}

/// Model input table: `guide, pam, context, gc_content`.
pub fn features_to_dataframe(features: &[GuideFeatures]) -> PolarsResult<DataFrame> {
    let guides: Vec<&str> = features.iter().map(|f| f.guide.as_str()).collect();
    let pams: Vec<&str> = features.iter().map(|f| f.pam.as_str()).collect();
    let contexts: Vec<Option<&str>> = features.iter().map(|f| f.context.as_deref()).collect();
    let gc: Vec<f64> = features.iter().map(|f| f.gc_content).collect();

    DataFrame::new(vec![
        Column::from(Series::new(PlSmallStr::from("guide"), guides)),
        Column::from(Series::new(PlSmallStr::from("pam"), pams)),
        Column::from(Series::new(PlSmallStr::from("context"), contexts)),
        Column::from(Series::new(PlSmallStr::from("gc_content"), gc)),
    ])
}
