//! Inter-model trust scoring
//!
//! Trust must be low both when the two sources disagree and when either
//! source is itself uninformative; multiplying agreement by average
//! confidence captures both failure modes in one scalar.

use crate::confidence::{confidence, validate_probability};
use crate::error::Result;

const HIGH_TRUST_FLOOR: f64 = 0.7;
const MODERATE_TRUST_FLOOR: f64 = 0.4;

/// Agreement-weighted confidence in the combined assessment.
///
/// `agreement = 1 - |p_img - p_vitals|`, multiplied by the mean of the
/// two individual confidences and clamped to [0, 1].
///
/// # Errors
/// Returns `EngineError::InvalidInput` if either probability is outside
/// [0, 1] or non-finite.
pub fn trust_score(imaging_probability: f64, vitals_probability: f64) -> Result<f64> {
    validate_probability("imaging_probability", imaging_probability)?;
    validate_probability("vitals_probability", vitals_probability)?;

    let agreement = 1.0 - (imaging_probability - vitals_probability).abs();
    let combined_confidence =
        (confidence(imaging_probability) + confidence(vitals_probability)) / 2.0;

    Ok((agreement * combined_confidence).clamp(0.0, 1.0))
}

/// Display band for a trust score.
pub fn interpret(trust: f64) -> &'static str {
    if trust > HIGH_TRUST_FLOOR {
        "High agreement & confidence"
    } else if trust > MODERATE_TRUST_FLOOR {
        "Moderate agreement"
    } else {
        "Low agreement - review inputs"
    }
}
