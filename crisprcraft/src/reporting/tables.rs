use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::info;

use crate::helper_functions::dataframe_to_csv;
use crate::models::{GuideCandidate, OffTargetRecord};

pub const CANDIDATES_FILE: &str = "grna_candidates.csv";
pub const OFF_TARGET_FILE: &str = "off_target.csv";

/// Candidate table with columns
/// `sequence, pam, location, gc_content, mismatches, score, efficiency`.
pub fn candidates_to_dataframe(candidates: &[GuideCandidate]) -> PolarsResult<DataFrame> {
    let sequence: Vec<&str> = candidates.iter().map(|c| c.sequence.as_str()).collect();
    let pam: Vec<&str> = candidates.iter().map(|c| c.pam.as_str()).collect();
    let location: Vec<&str> = candidates.iter().map(|c| c.location.as_str()).collect();
    let gc_content: Vec<f64> = candidates.iter().map(|c| c.gc_content).collect();
    let mismatches: Vec<u32> = candidates.iter().map(|c| c.mismatches as u32).collect();
    let score: Vec<f64> = candidates.iter().map(|c| c.score).collect();
    let efficiency: Vec<f64> = candidates.iter().map(|c| c.efficiency).collect();

    DataFrame::new(vec![
        Column::from(Series::new(PlSmallStr::from("sequence"), sequence)),
        Column::from(Series::new(PlSmallStr::from("pam"), pam)),
        Column::from(Series::new(PlSmallStr::from("location"), location)),
        Column::from(Series::new(PlSmallStr::from("gc_content"), gc_content)),
        Column::from(Series::new(PlSmallStr::from("mismatches"), mismatches)),
        Column::from(Series::new(PlSmallStr::from("score"), score)),
        Column::from(Series::new(PlSmallStr::from("efficiency"), efficiency)),
    ])
}

pub fn write_candidates(df: &DataFrame, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(CANDIDATES_FILE);
    dataframe_to_csv(df, &path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {} candidates to {}", df.height(), path.display());
    Ok(path)
}

pub fn write_off_targets(records: &[OffTargetRecord], output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(OFF_TARGET_FILE);
    let mut wtr = csv::Writer::from_path(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    info!("Wrote {} off-target rows to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::off_target::classify_off_targets;
    use crate::helper_functions::read_csv;

    fn sample() -> Vec<GuideCandidate> {
        vec![
            GuideCandidate {
                sequence: "AAAAAAAAAAAAAAAAAAAA".to_string(),
                pam: "AGG".to_string(),
                location: "seq:1-20".to_string(),
                start: 0,
                gc_content: 0.0,
                mismatches: 0,
                score: 100.0,
                efficiency: 42.5,
            },
            GuideCandidate {
                sequence: "CCCCCCCCCCCCCCCCCCCC".to_string(),
                pam: "TGG".to_string(),
                location: "seq:21-40".to_string(),
                start: 20,
                gc_content: 100.0,
                mismatches: 20,
                score: 0.0,
                efficiency: 7.0,
            },
        ]
    }

    #[test]
    fn candidate_columns_in_export_order() {
        let df = candidates_to_dataframe(&sample()).unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["sequence", "pam", "location", "gc_content", "mismatches", "score", "efficiency"]
        );
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn candidate_csv_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let df = candidates_to_dataframe(&sample()).unwrap();
        let path = write_candidates(&df, dir.path()).unwrap();

        let back = read_csv(&path).unwrap();
        assert_eq!(back.height(), 2);
        let scores: Vec<Option<f64>> = back.column("score").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(scores, vec![Some(100.0), Some(0.0)]);
    }

    #[test]
    fn off_target_csv_has_header_and_labels() {
        let dir = tempfile::tempdir().unwrap();
        let guides = sample();
        let records = classify_off_targets(&guides, "");
        let path = write_off_targets(&records, dir.path()).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("sequence,location,risk,description,in_sequence_repeats")
        );
        assert!(lines.next().unwrap().contains(",Low,"));
        assert!(lines.next().unwrap().contains(",Medium,"));
    }
}
