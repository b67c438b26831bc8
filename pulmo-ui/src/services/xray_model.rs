//! External chest X-ray classifier client
//!
//! Invokes the image classification script as a subprocess with the
//! image path; the script prints label, probability, and a base64
//! annotated overlay on stdout.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// X-ray model client errors
#[derive(Debug, Error)]
pub enum XrayModelError {
    /// Classifier script not found at the configured path
    #[error("X-ray model script not found: {0}")]
    ScriptNotFound(String),

    /// Image file not found at path
    #[error("Image file not found: {0}")]
    ImageNotFound(String),

    /// Failed to execute the interpreter
    #[error("Failed to execute X-ray model: {0}")]
    ExecutionError(String),

    /// Script ran but reported an analysis failure
    #[error("X-ray analysis failed: {0}")]
    AnalysisFailed(String),

    /// Failed to parse the script's JSON output
    #[error("Failed to parse X-ray model output: {0}")]
    ParseError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Output contract of the classifier script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrayAnalysis {
    /// "PNEUMONIA" or "NORMAL" (probability >= 0.25 labels PNEUMONIA)
    pub label: String,
    /// Pneumonia-pattern probability
    pub probability: f64,
    /// Base64 PNG of the annotated overlay
    pub image: String,
}

#[derive(Debug, Deserialize)]
struct ScriptError {
    error: Option<String>,
}

/// X-ray model client
pub struct XrayModelClient {
    python_bin: String,
    script_path: PathBuf,
}

impl XrayModelClient {
    /// Create a client for the script at `models_dir/xray_api.py`.
    pub fn new(python_bin: &str, models_dir: &Path) -> Self {
        Self {
            python_bin: python_bin.to_string(),
            script_path: models_dir.join("xray_api.py"),
        }
    }

    /// Classify a chest X-ray image.
    pub async fn analyze(&self, image_path: &Path) -> Result<XrayAnalysis, XrayModelError> {
        if !self.script_path.exists() {
            return Err(XrayModelError::ScriptNotFound(
                self.script_path.display().to_string(),
            ));
        }
        if !image_path.exists() {
            return Err(XrayModelError::ImageNotFound(
                image_path.display().to_string(),
            ));
        }

        tracing::debug!(
            script = %self.script_path.display(),
            image = %image_path.display(),
            "Running X-ray classification"
        );

        let output = tokio::task::spawn_blocking({
            let python = self.python_bin.clone();
            let script = self.script_path.clone();
            let image = image_path.to_path_buf();

            move || Command::new(&python).arg(&script).arg(&image).output()
        })
        .await
        .map_err(|e| XrayModelError::ExecutionError(format!("Task join error: {}", e)))?
        .map_err(|e| XrayModelError::ExecutionError(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if let Ok(ScriptError { error: Some(msg) }) =
                serde_json::from_str::<ScriptError>(stdout.trim())
            {
                return Err(XrayModelError::AnalysisFailed(msg));
            }
            return Err(XrayModelError::AnalysisFailed(format!(
                "Exit code: {:?}, stderr: {}",
                output.status.code(),
                stderr
            )));
        }

        if let Ok(ScriptError { error: Some(msg) }) =
            serde_json::from_str::<ScriptError>(stdout.trim())
        {
            return Err(XrayModelError::AnalysisFailed(msg));
        }

        let analysis: XrayAnalysis = serde_json::from_str(stdout.trim())
            .map_err(|e| XrayModelError::ParseError(e.to_string()))?;

        if !(0.0..=1.0).contains(&analysis.probability) || !analysis.probability.is_finite() {
            return Err(XrayModelError::ParseError(format!(
                "Probability out of range: {}",
                analysis.probability
            )));
        }

        tracing::info!(
            label = %analysis.label,
            probability = analysis.probability,
            "X-ray classification completed"
        );

        Ok(analysis)
    }
}
