//! Run configuration.
//!
//! Values come from an optional JSON file; command line flags are layered on
//! top in `main`. Every field has a default so an empty `{}` file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::helper_functions::resolve_path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignerConfig {
    pub output_dir: PathBuf,
    /// Keep at most this many candidates, in scan order.
    pub max_guides: Option<usize>,
    /// Seed for the random efficiency fallback; unseeded when absent.
    pub random_seed: Option<u64>,
    pub histogram_bins: usize,
    pub plot_width: u32,
    pub plot_height: u32,
    pub efficiency_model: EfficiencyModelConfig,
}

impl Default for DesignerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./crisprcraft_results"),
            max_guides: None,
            random_seed: None,
            histogram_bins: 20,
            plot_width: 800,
            plot_height: 600,
            efficiency_model: EfficiencyModelConfig::default(),
        }
    }
}

/// External on-target model invoked as `<python> <script> --input <csv> --output <csv>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyModelConfig {
    /// Interpreter name looked up on `PATH`, or a path to a venv interpreter.
    pub python: String,
    /// Prediction script; the model is disabled when unset.
    pub script: Option<PathBuf>,
    pub work_dir: PathBuf,
}

impl Default for EfficiencyModelConfig {
    fn default() -> Self {
        Self {
            python: "python3".to_string(),
            script: None,
            work_dir: PathBuf::from("./processed_data"),
        }
    }
}

impl DesignerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let path = resolve_path(path);
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: DesignerConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        debug!("{:?}", config);
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
