//! External tabular-risk model client
//!
//! Invokes the vitals scoring script as a subprocess. The JSON payload
//! is written to a temp file and passed by path (command-line escaping
//! of inline JSON is not portable); the script prints its result JSON
//! on stdout. A failed invocation is always surfaced as an error, never
//! as a default probability, so a missing score stays distinguishable
//! from a genuine low-risk score.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use pulmo_engine::advisory::{AgeAdjustedFlags, Contributor};
use pulmo_engine::{AgeGroup, VitalsSnapshot};

/// Vitals model client errors
#[derive(Debug, Error)]
pub enum VitalsModelError {
    /// Scoring script not found at the configured path
    #[error("Vitals model script not found: {0}")]
    ScriptNotFound(String),

    /// Failed to execute the interpreter
    #[error("Failed to execute vitals model: {0}")]
    ExecutionError(String),

    /// Script ran but reported an analysis failure
    #[error("Vitals analysis failed: {0}")]
    AnalysisFailed(String),

    /// Failed to parse the script's JSON output
    #[error("Failed to parse vitals model output: {0}")]
    ParseError(String),

    /// I/O error (temp file write/read)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Output contract of the vitals scoring script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsAnalysis {
    /// Pneumonia-pattern probability from the tabular model
    pub vitals_probability: f64,
    /// Ranked feature contributions (signed)
    pub top_contributors: Vec<Contributor>,
    /// Plain-language explanations of the top contributors
    pub risk_factors_text: Vec<String>,
    /// Age-adjusted interpretation of the rate vitals
    pub age_adjusted_flags: AgeAdjustedFlags,
    /// Raw per-feature attribution values for the waterfall display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shap_values: Option<serde_json::Value>,
}

/// Payload-level error report some script failures produce alongside a
/// zero exit.
#[derive(Debug, Deserialize)]
struct ScriptError {
    error: Option<String>,
}

/// Vitals model client
pub struct VitalsModelClient {
    python_bin: String,
    script_path: PathBuf,
}

impl VitalsModelClient {
    /// Create a client for the script at `models_dir/vitals_api.py`.
    pub fn new(python_bin: &str, models_dir: &Path) -> Self {
        Self {
            python_bin: python_bin.to_string(),
            script_path: models_dir.join("vitals_api.py"),
        }
    }

    /// Score a vitals snapshot through the external model.
    pub async fn analyze(
        &self,
        vitals: &VitalsSnapshot,
        age_group: AgeGroup,
    ) -> Result<VitalsAnalysis, VitalsModelError> {
        if !self.script_path.exists() {
            return Err(VitalsModelError::ScriptNotFound(
                self.script_path.display().to_string(),
            ));
        }

        let payload = json!({
            "vitals": vitals,
            "age_group": age_group.as_str(),
        });

        let temp_input =
            std::env::temp_dir().join(format!("vitals_input_{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&temp_input, payload.to_string()).await?;

        tracing::debug!(
            script = %self.script_path.display(),
            input = %temp_input.display(),
            "Running vitals model analysis"
        );

        let output = tokio::task::spawn_blocking({
            let python = self.python_bin.clone();
            let script = self.script_path.clone();
            let input = temp_input.clone();

            move || Command::new(&python).arg(&script).arg(&input).output()
        })
        .await
        .map_err(|e| VitalsModelError::ExecutionError(format!("Task join error: {}", e)))?;

        // Temp file is no longer needed whatever happened.
        let _ = std::fs::remove_file(&temp_input);

        let output = output.map_err(|e| VitalsModelError::ExecutionError(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // Failed runs still print an error JSON on stdout; prefer
            // its message over raw stderr when present.
            if let Ok(ScriptError { error: Some(msg) }) =
                serde_json::from_str::<ScriptError>(stdout.trim())
            {
                return Err(VitalsModelError::AnalysisFailed(msg));
            }
            return Err(VitalsModelError::AnalysisFailed(format!(
                "Exit code: {:?}, stderr: {}",
                output.status.code(),
                stderr
            )));
        }

        if let Ok(ScriptError { error: Some(msg) }) =
            serde_json::from_str::<ScriptError>(stdout.trim())
        {
            return Err(VitalsModelError::AnalysisFailed(msg));
        }

        let analysis: VitalsAnalysis = serde_json::from_str(stdout.trim())
            .map_err(|e| VitalsModelError::ParseError(e.to_string()))?;

        if !(0.0..=1.0).contains(&analysis.vitals_probability)
            || !analysis.vitals_probability.is_finite()
        {
            return Err(VitalsModelError::ParseError(format!(
                "Probability out of range: {}",
                analysis.vitals_probability
            )));
        }

        tracing::info!(
            probability = analysis.vitals_probability,
            contributors = analysis.top_contributors.len(),
            "Vitals model analysis completed"
        );

        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_is_reported_before_spawn() {
        let client = VitalsModelClient::new("python3", Path::new("/nonexistent"));
        let rt = tokio::runtime::Runtime::new().unwrap();
        let err = rt
            .block_on(client.analyze(&VitalsSnapshot::default(), AgeGroup::Preschool))
            .unwrap_err();
        assert!(matches!(err, VitalsModelError::ScriptNotFound(_)));
    }

    #[test]
    fn analysis_output_parses() {
        let raw = r#"{
            "vitals_probability": 0.82,
            "top_contributors": [
                {"feature": "RespRate_trend", "contribution": 1.96},
                {"feature": "SpO2_trend", "contribution": -0.4}
            ],
            "risk_factors_text": ["Increasing respiratory rate indicates worsening breathing effort"],
            "age_adjusted_flags": {"HeartRate": "Normal for age", "RespRate": "High for age"},
            "shap_values": {"RespRate_trend": 1.96}
        }"#;
        let analysis: VitalsAnalysis = serde_json::from_str(raw).unwrap();
        assert_eq!(analysis.vitals_probability, 0.82);
        assert_eq!(analysis.top_contributors.len(), 2);
        assert!(analysis.shap_values.is_some());
    }

    #[test]
    fn shap_values_are_optional() {
        let raw = r#"{
            "vitals_probability": 0.3,
            "top_contributors": [],
            "risk_factors_text": [],
            "age_adjusted_flags": {"HeartRate": "Normal for age", "RespRate": "Normal for age"}
        }"#;
        let analysis: VitalsAnalysis = serde_json::from_str(raw).unwrap();
        assert!(analysis.shap_values.is_none());
    }
}
