//! Gated evidence fusion
//!
//! Combines the imaging and vitals probabilities into one risk score.
//! The weighting is a two-regime gate keyed on imaging confidence, not
//! a smooth blend: imaging leads when its estimate is decisive, vitals
//! lead when it is ambiguous. A safety cap suppresses critical-range
//! scores that the vitals evidence does not corroborate.

use serde::{Deserialize, Serialize};

use crate::confidence::{confidence, validate_probability};
use crate::error::Result;

/// Imaging confidence below this value routes weight to the vitals side.
pub const CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Weights (imaging, vitals) when imaging confidence clears the gate.
const HIGH_CONFIDENCE_WEIGHTS: (f64, f64) = (0.6, 0.4);
/// Weights (imaging, vitals) when imaging confidence is reduced.
const LOW_CONFIDENCE_WEIGHTS: (f64, f64) = (0.4, 0.6);

/// Fused score above this value is eligible for the safety cap.
const SAFETY_CAP_TRIGGER: f64 = 0.8;
/// Vitals probability below this value fails to corroborate a high score.
const SAFETY_CAP_VITALS_FLOOR: f64 = 0.65;
/// Capped score, just under the critical triage threshold.
const SAFETY_CAP_SCORE: f64 = 0.78;

const GATE_HIGH_CONFIDENCE: &str = "High confidence imaging evidence";
const GATE_LOW_CONFIDENCE: &str = "Imaging confidence reduced → vitals weighted higher";

/// Result of gated fusion, with everything the transparency display needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionOutcome {
    /// Fused risk score
    pub final_score: f64,
    /// Weight applied to the imaging probability
    pub imaging_weight: f64,
    /// Weight applied to the vitals probability
    pub vitals_weight: f64,
    /// Confidence of the imaging probability
    pub imaging_confidence: f64,
    /// Why the gate chose this weighting
    pub gate_rationale: String,
    /// Whether the clinical safety cap overrode the weighted sum
    pub safety_cap_applied: bool,
}

/// Fuse imaging and vitals probabilities into a single risk score.
///
/// The gate compares imaging confidence against [`CONFIDENCE_THRESHOLD`]
/// with strict `<`: at exactly the threshold, imaging keeps the lead.
/// If the weighted sum exceeds 0.8 while the vitals probability sits
/// below 0.65, the score is overridden to 0.78, a deliberate clinical
/// guardrail against imaging alone pushing the classification into
/// critical territory.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if either probability is outside
/// [0, 1] or non-finite.
pub fn fuse(imaging_probability: f64, vitals_probability: f64) -> Result<FusionOutcome> {
    validate_probability("imaging_probability", imaging_probability)?;
    validate_probability("vitals_probability", vitals_probability)?;

    let imaging_confidence = confidence(imaging_probability);

    let ((imaging_weight, vitals_weight), gate_rationale) =
        if imaging_confidence < CONFIDENCE_THRESHOLD {
            (LOW_CONFIDENCE_WEIGHTS, GATE_LOW_CONFIDENCE)
        } else {
            (HIGH_CONFIDENCE_WEIGHTS, GATE_HIGH_CONFIDENCE)
        };

    let weighted = imaging_weight * imaging_probability + vitals_weight * vitals_probability;

    let safety_cap_applied =
        vitals_probability < SAFETY_CAP_VITALS_FLOOR && weighted > SAFETY_CAP_TRIGGER;
    let final_score = if safety_cap_applied {
        SAFETY_CAP_SCORE
    } else {
        weighted
    };

    Ok(FusionOutcome {
        final_score,
        imaging_weight,
        vitals_weight,
        imaging_confidence,
        gate_rationale: gate_rationale.to_string(),
        safety_cap_applied,
    })
}
