//! Fallback vitals probability scorer
//!
//! Additive threshold scoring over the vitals snapshot. This is the
//! client-side fallback for when the external tabular-risk model is
//! unavailable; it is deliberately simpler than that model and the two
//! paths are kept as alternatives, never merged.

use crate::error::Result;
use crate::types::VitalsSnapshot;

/// Score a vitals snapshot into a pneumonia-pattern probability.
///
/// Each abnormal signal contributes a fixed number of points; the sum
/// is capped at 1.0. All terms are non-negative, so no lower clamp is
/// needed.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if any vitals field is non-finite.
pub fn score_vitals(vitals: &VitalsSnapshot) -> Result<f64> {
    vitals.validate()?;

    let mut score: f64 = 0.0;

    if vitals.temperature_c > 38.0 {
        score += 0.2;
    } else if vitals.temperature_c > 37.5 {
        score += 0.1;
    }

    if vitals.spo2_percent < 90.0 {
        score += 0.3;
    } else if vitals.spo2_percent < 95.0 {
        score += 0.15;
    }

    if vitals.heart_rate_bpm > 120.0 {
        score += 0.15;
    } else if vitals.heart_rate_bpm > 100.0 {
        score += 0.1;
    }

    if vitals.resp_rate_bpm > 35.0 {
        score += 0.2;
    } else if vitals.resp_rate_bpm > 28.0 {
        score += 0.1;
    }

    if vitals.cough {
        score += 0.1;
    }
    if vitals.retractions {
        score += 0.1;
    }

    Ok(score.min(1.0))
}
