use std::fs;
use std::path::{Path, PathBuf};

use bio::io::fasta;
use tracing::{debug, info, warn};

use crate::models::{DesignError, TargetSequence};

const FASTA_EXTENSIONS: [&str; 4] = ["fa", "fasta", "fna", "fas"];
const PASTED_ID: &str = "pasted_sequence";

/// Where the target DNA comes from: an uploaded file or pasted text.
#[derive(Debug, Clone)]
pub enum SequenceSource {
    File(PathBuf),
    Text(String),
}

impl SequenceSource {
    pub fn from_args(input: Option<PathBuf>, sequence: Option<String>) -> Result<Self, DesignError> {
        match (input, sequence) {
            (Some(path), _) => Ok(SequenceSource::File(path)),
            (None, Some(text)) => Ok(SequenceSource::Text(text)),
            (None, None) => Err(DesignError::MissingInput),
        }
    }

    /// Reads the sequence and upper-cases it. Only the first FASTA record is used.
    pub fn load(&self) -> Result<TargetSequence, DesignError> {
        let target = match self {
            SequenceSource::File(path) => {
                info!("Reading sequence from {}", path.display());
                let raw = fs::read_to_string(path).map_err(|source| DesignError::UnreadableInput {
                    path: path.clone(),
                    source,
                })?;
                if has_fasta_extension(path) || looks_like_fasta(&raw) {
                    parse_first_record(&raw, path)?
                } else {
                    TargetSequence {
                        id: file_stem(path),
                        bases: normalize(&raw),
                    }
                }
            }
            SequenceSource::Text(text) => {
                if looks_like_fasta(text) {
                    parse_first_record(text, Path::new(PASTED_ID))?
                } else {
                    TargetSequence {
                        id: PASTED_ID.to_string(),
                        bases: normalize(text),
                    }
                }
            }
        };

        if target.bases.is_empty() {
            return Err(DesignError::EmptySequence);
        }
        debug!("Loaded `{}` with {} bases", target.id, target.bases.len());
        Ok(target)
    }
}

fn has_fasta_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| FASTA_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn looks_like_fasta(raw: &str) -> bool {
    raw.trim_start().starts_with('>')
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sequence")
        .to_string()
}

/// Drops all whitespace (line breaks included) and upper-cases.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

fn parse_first_record(raw: &str, origin: &Path) -> Result<TargetSequence, DesignError> {
    let reader = fasta::Reader::new(raw.trim_start().as_bytes());
    let mut records = reader.records();

    let record = match records.next() {
        Some(Ok(record)) => record,
        Some(Err(source)) => {
            return Err(DesignError::UnreadableInput {
                path: origin.to_path_buf(),
                source,
            })
        }
        None => return Err(DesignError::EmptyFasta(origin.to_path_buf())),
    };

    if records.next().is_some() {
        warn!(
            "{} holds more than one record; only `{}` is analysed",
            origin.display(),
            record.id()
        );
    }

    let bases = String::from_utf8_lossy(record.seq());
    let id = if record.id().is_empty() {
        file_stem(origin)
    } else {
        record.id().to_string()
    };
    Ok(TargetSequence {
        id,
        bases: normalize(&bases),
    })
}
