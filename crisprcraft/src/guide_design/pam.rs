use std::ops::Range;

use regex::Regex;
use tracing::debug;

use crate::models::DesignError;

/// A PAM motif compiled to a regex. `N` and the other IUPAC ambiguity codes
/// become single-character classes; plain bases match themselves.
#[derive(Debug, Clone)]
pub struct PamPattern {
    motif: String,
    regex: Regex,
}

fn iupac_class(base: char) -> Option<&'static str> {
    match base {
        'A' => Some("A"),
        'C' => Some("C"),
        'G' => Some("G"),
        'T' => Some("T"),
        'N' => Some("."),
        'R' => Some("[AG]"),
        'Y' => Some("[CT]"),
        'S' => Some("[CG]"),
        'W' => Some("[AT]"),
        'K' => Some("[GT]"),
        'M' => Some("[AC]"),
        'B' => Some("[CGT]"),
        'D' => Some("[AGT]"),
        'H' => Some("[ACT]"),
        'V' => Some("[ACG]"),
        _ => None,
    }
}

impl PamPattern {
    pub fn compile(motif: &str) -> Result<Self, DesignError> {
        let motif = motif.trim().to_uppercase();
        let invalid = |reason: String| DesignError::InvalidPam {
            pattern: motif.clone(),
            reason,
        };

        if motif.is_empty() {
            return Err(invalid("pattern is empty".to_string()));
        }

        let mut expr = String::with_capacity(motif.len() * 4);
        for base in motif.chars() {
            match iupac_class(base) {
                Some(class) => expr.push_str(class),
                None => return Err(invalid(format!("`{base}` is not a nucleotide code"))),
            }
        }

        let regex = Regex::new(&expr).map_err(|e| invalid(e.to_string()))?;
        debug!("Compiled PAM {} to /{}/", motif, expr);
        Ok(Self { motif, regex })
    }

    pub fn motif(&self) -> &str {
        &self.motif
    }

    /// Byte ranges of every match, leftmost-first and non-overlapping.
    pub fn sites(&self, sequence: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(sequence).map(|m| m.range()).collect()
    }
}
