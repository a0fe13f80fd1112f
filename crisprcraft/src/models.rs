use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

/// Length of the protospacer window kept in front of every PAM hit.
pub const GUIDE_LENGTH: usize = 20;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error("no DNA sequence supplied: pass --input or --sequence")]
    MissingInput,

    #[error("the supplied sequence is empty")]
    EmptySequence,

    #[error("invalid PAM pattern `{pattern}`: {reason}")]
    InvalidPam { pattern: String, reason: String },

    #[error("could not read sequence file {}: {source}", path.display())]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("FASTA file {} contains no records", .0.display())]
    EmptyFasta(PathBuf),

    #[error("efficiency model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("efficiency model failed: {0}")]
    ExternalModel(String),
}

/// PAM choices offered by the tool; `Other` takes a user supplied pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PamPreset {
    Ngg,
    Nag,
    Ntg,
    Other,
}

impl PamPreset {
    pub const DEFAULT_CUSTOM: &'static str = "NGG";

    /// Pattern string for the preset; `custom` is only consulted for `Other`.
    pub fn pattern(self, custom: Option<&str>) -> String {
        match self {
            PamPreset::Ngg => "NGG".to_string(),
            PamPreset::Nag => "NAG".to_string(),
            PamPreset::Ntg => "NTG".to_string(),
            PamPreset::Other => custom
                .map(|p| p.trim().to_uppercase())
                .unwrap_or_else(|| Self::DEFAULT_CUSTOM.to_string()),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PamPreset::Ngg => "SpCas9 canonical PAM",
            PamPreset::Nag => "SpCas9 non-canonical PAM (weaker)",
            PamPreset::Ntg => "engineered Cas9 variant PAM",
            PamPreset::Other => "custom pattern given with --custom-pam",
        }
    }
}

/// A DNA sequence together with the identifier used in location labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSequence {
    pub id: String,
    pub bases: String,
}

/// One scored protospacer in front of a PAM hit.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideCandidate {
    pub sequence: String,
    pub pam: String,
    pub location: String,
    /// Zero-based byte offset of the first guide base.
    pub start: usize,
    pub gc_content: f64,
    pub mismatches: usize,
    pub score: f64,
    pub efficiency: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OffTargetRisk {
    Low,
    Medium,
    High,
}

impl OffTargetRisk {
    pub const CYCLE: [OffTargetRisk; 3] =
        [OffTargetRisk::Low, OffTargetRisk::Medium, OffTargetRisk::High];

    pub fn description(self) -> &'static str {
        match self {
            OffTargetRisk::Low => "Few predicted off-target sites",
            OffTargetRisk::Medium => "Some predicted off-target sites; verify before use",
            OffTargetRisk::High => "Many predicted off-target sites; avoid if alternatives exist",
        }
    }
}

impl fmt::Display for OffTargetRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OffTargetRisk::Low => "Low",
            OffTargetRisk::Medium => "Medium",
            OffTargetRisk::High => "High",
        };
        f.write_str(label)
    }
}

/// Row of the off-target table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffTargetRecord {
    pub sequence: String,
    pub location: String,
    pub risk: OffTargetRisk,
    pub description: &'static str,
    pub in_sequence_repeats: usize,
}
