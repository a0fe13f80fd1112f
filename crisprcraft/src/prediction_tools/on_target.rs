use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::helper_functions::round2;
use crate::models::{DesignError, GuideCandidate};
use crate::prediction_tools::features::GuideFeatures;

/// Anything that can turn guide features into 0-100 efficiency values,
/// one per input row, in order.
pub trait EfficiencyPredictor {
    fn name(&self) -> &str;
    fn predict(&mut self, features: &[GuideFeatures]) -> Result<Vec<f64>, DesignError>;
}

/// Content-independent placeholder: uniform draws from [0, 100].
pub struct RandomFallback {
    rng: StdRng,
}

impl RandomFallback {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl EfficiencyPredictor for RandomFallback {
    fn name(&self) -> &str {
        "random placeholder"
    }

    fn predict(&mut self, features: &[GuideFeatures]) -> Result<Vec<f64>, DesignError> {
        Ok(features
            .iter()
            .map(|_| round2(self.rng.gen_range(0.0..=100.0)))
            .collect())
    }
}

/// Which predictor produced the efficiency column.
#[derive(Debug, Clone, PartialEq)]
pub enum EfficiencySource {
    Model(String),
    /// Random values; `reason` says why the model was not used.
    Fallback { reason: String },
}

impl EfficiencySource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, EfficiencySource::Fallback { .. })
    }
}

impl fmt::Display for EfficiencySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfficiencySource::Model(name) => write!(f, "{name}"),
            EfficiencySource::Fallback { reason } => {
                write!(f, "random placeholder values ({reason})")
            }
        }
    }
}

/// Fills `efficiency` on every candidate. An unavailable or failing model
/// degrades to `fallback`; the returned source records which one ran and why.
pub fn estimate_efficiency(
    candidates: &mut [GuideCandidate],
    features: &[GuideFeatures],
    model: Result<&mut dyn EfficiencyPredictor, DesignError>,
    fallback: &mut dyn EfficiencyPredictor,
) -> EfficiencySource {
    let mut source = match model {
        Err(e) => EfficiencySource::Fallback {
            reason: e.to_string(),
        },
        Ok(model) => match model.predict(features) {
            Ok(values) if values.len() == candidates.len() => {
                info!("Efficiency predicted by {}", model.name());
                apply(candidates, &values);
                return EfficiencySource::Model(model.name().to_string());
            }
            Ok(values) => EfficiencySource::Fallback {
                reason: format!(
                    "{} returned {} values for {} guides",
                    model.name(),
                    values.len(),
                    candidates.len()
                ),
            },
            Err(e) => EfficiencySource::Fallback {
                reason: e.to_string(),
            },
        },
    };

    if let EfficiencySource::Fallback { reason } = &source {
        warn!("Using random efficiency values: {reason}");
    }
    match fallback.predict(features) {
        Ok(values) => apply(candidates, &values),
        Err(e) => {
            warn!("Fallback predictor failed as well: {e}");
            source = EfficiencySource::Fallback {
                reason: format!("{source}; fallback failed: {e}"),
            };
        }
    }
    source
}

fn apply(candidates: &mut [GuideCandidate], values: &[f64]) {
    for (candidate, value) in candidates.iter_mut().zip(values) {
        candidate.efficiency = value.clamp(0.0, 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f64>);

    impl EfficiencyPredictor for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }
        fn predict(&mut self, _features: &[GuideFeatures]) -> Result<Vec<f64>, DesignError> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl EfficiencyPredictor for Broken {
        fn name(&self) -> &str {
            "broken"
        }
        fn predict(&mut self, _features: &[GuideFeatures]) -> Result<Vec<f64>, DesignError> {
            Err(DesignError::ExternalModel("interpreter exited with status 1".into()))
        }
    }

    fn candidates(n: usize) -> Vec<GuideCandidate> {
        (0..n)
            .map(|i| GuideCandidate {
                sequence: "ACGTACGTACGTACGTACGT".to_string(),
                pam: "AGG".to_string(),
                location: format!("seq:{}-{}", i + 1, i + 20),
                start: i,
                gc_content: 50.0,
                mismatches: 0,
                score: 100.0,
                efficiency: 0.0,
            })
            .collect()
    }

    fn features(candidates: &[GuideCandidate]) -> Vec<GuideFeatures> {
        candidates
            .iter()
            .map(|c| GuideFeatures {
                guide: c.sequence.clone(),
                pam: c.pam.clone(),
                context: None,
                gc_content: c.gc_content,
            })
            .collect()
    }

    #[test]
    fn model_values_are_used_and_clamped() {
        let mut rows = candidates(3);
        let feats = features(&rows);
        let mut model = Fixed(vec![10.0, 120.0, -4.0]);
        let mut fallback = RandomFallback::new(Some(1));

        let source = estimate_efficiency(&mut rows, &feats, Ok(&mut model), &mut fallback);

        assert_eq!(source, EfficiencySource::Model("fixed".to_string()));
        let eff: Vec<f64> = rows.iter().map(|c| c.efficiency).collect();
        assert_eq!(eff, vec![10.0, 100.0, 0.0]);
    }

    #[test]
    fn failing_model_falls_back_with_reason() {
        let mut rows = candidates(5);
        let feats = features(&rows);
        let mut fallback = RandomFallback::new(Some(7));

        let source = estimate_efficiency(&mut rows, &feats, Ok(&mut Broken), &mut fallback);

        assert!(source.is_fallback());
        assert!(source.to_string().contains("status 1"));
        assert!(rows.iter().all(|c| (0.0..=100.0).contains(&c.efficiency)));
    }

    #[test]
    fn short_model_output_falls_back() {
        let mut rows = candidates(3);
        let feats = features(&rows);
        let mut model = Fixed(vec![50.0]);
        let mut fallback = RandomFallback::new(Some(7));

        let source = estimate_efficiency(&mut rows, &feats, Ok(&mut model), &mut fallback);
        assert!(matches!(source, EfficiencySource::Fallback { ref reason } if reason.contains("1 values for 3")));
    }

    #[test]
    fn missing_model_is_reported() {
        let mut rows = candidates(2);
        let feats = features(&rows);
        let mut fallback = RandomFallback::new(None);

        let unavailable = DesignError::ModelUnavailable("no script configured".to_string());
        let source = estimate_efficiency(&mut rows, &feats, Err(unavailable), &mut fallback);
        assert_eq!(
            source,
            EfficiencySource::Fallback {
                reason: "efficiency model unavailable: no script configured".to_string()
            }
        );
        assert!(rows.iter().all(|c| (0.0..=100.0).contains(&c.efficiency)));
    }

    #[test]
    fn seeded_fallback_is_reproducible() {
        let rows = candidates(10);
        let feats = features(&rows);
        let a = RandomFallback::new(Some(42)).predict(&feats).unwrap();
        let b = RandomFallback::new(Some(42)).predict(&feats).unwrap();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..=100.0).contains(v)));
    }
}
