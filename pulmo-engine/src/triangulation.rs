//! Evidence triangulation narrative
//!
//! Cross-modal consistency check: do imaging, vitals, and the extracted
//! risk factors tell the same story? First matching row of the decision
//! table wins.

use crate::confidence::validate_probability;
use crate::error::Result;
use crate::risk_factors::RiskFactor;

/// Probability at or above which a source counts as supporting detection.
const SUPPORT_THRESHOLD: f64 = 0.75;

/// Risk factor text fragments that indicate physiological distress.
const DISTRESS_KEYWORDS: [&str; 4] = ["oxygen", "spo2", "respiratory", "breathing"];

const NARRATIVE_HIGH: &str =
    "High-confidence detection: imaging findings align with physiological distress indicators.";
const NARRATIVE_MODERATE: &str =
    "Moderate-confidence detection: imaging and physiological signals are concordant.";
const NARRATIVE_LOW: &str =
    "Low-confidence detection: partial agreement between evidence sources.";
const NARRATIVE_NONE: &str =
    "No strong concordance between imaging and physiological indicators.";

/// Select the triangulation narrative for the given evidence.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if either probability is outside
/// [0, 1] or non-finite.
pub fn triangulate(
    imaging_probability: f64,
    vitals_probability: f64,
    risk_factors: &[RiskFactor],
) -> Result<&'static str> {
    validate_probability("imaging_probability", imaging_probability)?;
    validate_probability("vitals_probability", vitals_probability)?;

    let imaging_support = imaging_probability >= SUPPORT_THRESHOLD;
    let vitals_support = vitals_probability >= SUPPORT_THRESHOLD;
    let phys_distress = risk_factors.iter().any(|factor| {
        let text = factor.as_str().to_lowercase();
        DISTRESS_KEYWORDS
            .iter()
            .any(|keyword| text.contains(keyword))
    });

    Ok(if imaging_support && vitals_support && phys_distress {
        NARRATIVE_HIGH
    } else if imaging_support && vitals_support {
        NARRATIVE_MODERATE
    } else if imaging_support || vitals_support {
        NARRATIVE_LOW
    } else {
        NARRATIVE_NONE
    })
}
