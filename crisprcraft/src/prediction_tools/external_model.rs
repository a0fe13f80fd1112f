use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use polars::prelude::*;
use tracing::{debug, error, info};

use crate::config::EfficiencyModelConfig;
use crate::helper_functions::{dataframe_to_csv, read_csv, resolve_path};
use crate::models::DesignError;
use crate::prediction_tools::features::{features_to_dataframe, GuideFeatures};
use crate::prediction_tools::on_target::EfficiencyPredictor;

/// Column the prediction script must write.
pub const PREDICTION_COLUMN: &str = "efficiency";

/// On-target model run out of process: features go in as CSV, the script
/// writes a CSV with an `efficiency` column in the same row order.
#[derive(Debug, Clone)]
pub struct ExternalModel {
    python: PathBuf,
    script: PathBuf,
    work_dir: PathBuf,
}

fn model_err(msg: impl Into<String>) -> DesignError {
    DesignError::ExternalModel(msg.into())
}

fn unavailable(msg: impl Into<String>) -> DesignError {
    DesignError::ModelUnavailable(msg.into())
}

impl ExternalModel {
    /// Resolves interpreter and script; fails when either cannot be found.
    pub fn from_config(config: &EfficiencyModelConfig) -> Result<Self, DesignError> {
        let script = config
            .script
            .as_deref()
            .map(resolve_path)
            .ok_or_else(|| unavailable("no script configured"))?;
        if !script.exists() {
            return Err(unavailable(format!("script not found at {}", script.display())));
        }

        let python = locate_interpreter(&config.python)?;
        info!("Using Python interpreter : {}", python.display());
        info!("Using prediction script  : {}", script.display());

        Ok(Self {
            python,
            script,
            work_dir: resolve_path(&config.work_dir),
        })
    }
}

fn locate_interpreter(python: &str) -> Result<PathBuf, DesignError> {
    let as_path = Path::new(python);
    if as_path.components().count() > 1 {
        let resolved = resolve_path(as_path);
        return if resolved.exists() {
            Ok(resolved)
        } else {
            Err(unavailable(format!("interpreter not found at {}", resolved.display())))
        };
    }
    which::which(python).map_err(|e| unavailable(format!("`{python}` not found on PATH: {e}")))
}

impl EfficiencyPredictor for ExternalModel {
    fn name(&self) -> &str {
        "external efficiency model"
    }

    fn predict(&mut self, features: &[GuideFeatures]) -> Result<Vec<f64>, DesignError> {
        fs::create_dir_all(&self.work_dir).map_err(|e| {
            model_err(format!("cannot create {}: {e}", self.work_dir.display()))
        })?;
        let input_path = self.work_dir.join("efficiency_input.csv");
        let output_path = self.work_dir.join("efficiency_output.csv");

        // 1) dump the feature table
        let df = features_to_dataframe(features).map_err(|e| model_err(e.to_string()))?;
        dataframe_to_csv(&df, &input_path).map_err(|e| model_err(e.to_string()))?;
        debug!("Wrote {} feature rows to {}", df.height(), input_path.display());

        // 2) call into Python
        let output = Command::new(&self.python)
            .arg(&self.script)
            .arg("--input")
            .arg(&input_path)
            .arg("--output")
            .arg(&output_path)
            .output()
            .map_err(|e| model_err(format!("failed to start {}: {e}", self.python.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("Efficiency model failed:\n{stderr}");
            return Err(model_err(format!(
                "model exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        debug!("Model stdout:\n{}", String::from_utf8_lossy(&output.stdout));

        // 3) read back what Python wrote
        let result = read_csv(&output_path).map_err(|e| model_err(e.to_string()))?;
        parse_predictions(&result)
    }
}

/// Pulls the prediction column out as f64; any null or non-numeric value is an error.
pub fn parse_predictions(df: &DataFrame) -> Result<Vec<f64>, DesignError> {
    let column = df
        .column(PREDICTION_COLUMN)
        .map_err(|_| model_err(format!("model output has no `{PREDICTION_COLUMN}` column")))?
        .cast(&DataType::Float64)
        .map_err(|e| model_err(format!("`{PREDICTION_COLUMN}` is not numeric: {e}")))?;

    let values = column.f64().map_err(|e| model_err(e.to_string()))?;
    values
        .into_iter()
        .enumerate()
        .map(|(row, v)| v.ok_or_else(|| model_err(format!("missing prediction at row {row}"))))
        .collect()
}
