//! Triage classification
//!
//! The fused score maps onto four ordered urgency levels through fixed
//! thresholds. These thresholds are the single source of truth; every
//! display vocabulary (the gate panel's "CRITICAL RISK", the report
//! styling's "CRITICAL") derives from the same enum.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Discrete clinical-urgency category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriageLevel {
    #[serde(rename = "LOW RISK")]
    LowRisk,
    #[serde(rename = "MODERATE RISK")]
    ModerateRisk,
    #[serde(rename = "HIGH RISK")]
    HighRisk,
    #[serde(rename = "CRITICAL RISK")]
    CriticalRisk,
}

impl TriageLevel {
    /// Label used by the risk-assessment display.
    pub fn label(&self) -> &'static str {
        match self {
            TriageLevel::LowRisk => "LOW RISK",
            TriageLevel::ModerateRisk => "MODERATE RISK",
            TriageLevel::HighRisk => "HIGH RISK",
            TriageLevel::CriticalRisk => "CRITICAL RISK",
        }
    }

    /// Shorter label variant used by report styling.
    pub fn report_label(&self) -> &'static str {
        match self {
            TriageLevel::CriticalRisk => "CRITICAL",
            other => other.label(),
        }
    }

    /// Recommended action for this level.
    pub fn recommendation(&self) -> &'static str {
        match self {
            TriageLevel::LowRisk => "Monitor at home",
            TriageLevel::ModerateRisk => "Further testing",
            TriageLevel::HighRisk => "Admit for observation",
            TriageLevel::CriticalRisk => "Immediate intervention",
        }
    }
}

impl std::fmt::Display for TriageLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a fused risk score into a triage level.
///
/// Bounds are lower-inclusive: 0.35 is already MODERATE, 0.60 already
/// HIGH, 0.80 already CRITICAL.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if the score is non-finite.
pub fn classify(final_score: f64) -> Result<TriageLevel> {
    if !final_score.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "final_score is not a finite number: {}",
            final_score
        )));
    }
    Ok(if final_score < 0.35 {
        TriageLevel::LowRisk
    } else if final_score < 0.60 {
        TriageLevel::ModerateRisk
    } else if final_score < 0.80 {
        TriageLevel::HighRisk
    } else {
        TriageLevel::CriticalRisk
    })
}

/// Severity mapping used by the report path, keyed on the vitals
/// probability alone.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if the probability is non-finite.
pub fn from_vitals_probability(vitals_probability: f64) -> Result<TriageLevel> {
    if !vitals_probability.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "vitals_probability is not a finite number: {}",
            vitals_probability
        )));
    }
    Ok(if vitals_probability >= 0.75 {
        TriageLevel::CriticalRisk
    } else if vitals_probability >= 0.50 {
        TriageLevel::HighRisk
    } else if vitals_probability >= 0.30 {
        TriageLevel::ModerateRisk
    } else {
        TriageLevel::LowRisk
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_boundaries_are_exact() {
        assert_eq!(classify(0.3499).unwrap(), TriageLevel::LowRisk);
        assert_eq!(classify(0.35).unwrap(), TriageLevel::ModerateRisk);
        assert_eq!(classify(0.5999).unwrap(), TriageLevel::ModerateRisk);
        assert_eq!(classify(0.60).unwrap(), TriageLevel::HighRisk);
        assert_eq!(classify(0.7999).unwrap(), TriageLevel::HighRisk);
        assert_eq!(classify(0.80).unwrap(), TriageLevel::CriticalRisk);
    }

    #[test]
    fn extremes_classify_sanely() {
        assert_eq!(classify(0.0).unwrap(), TriageLevel::LowRisk);
        assert_eq!(classify(1.0).unwrap(), TriageLevel::CriticalRisk);
    }

    #[test]
    fn levels_are_ordered_by_urgency() {
        assert!(TriageLevel::LowRisk < TriageLevel::ModerateRisk);
        assert!(TriageLevel::ModerateRisk < TriageLevel::HighRisk);
        assert!(TriageLevel::HighRisk < TriageLevel::CriticalRisk);
    }

    #[test]
    fn recommendations_match_levels() {
        assert_eq!(classify(0.1).unwrap().recommendation(), "Monitor at home");
        assert_eq!(classify(0.5).unwrap().recommendation(), "Further testing");
        assert_eq!(
            classify(0.7).unwrap().recommendation(),
            "Admit for observation"
        );
        assert_eq!(
            classify(0.9).unwrap().recommendation(),
            "Immediate intervention"
        );
    }

    #[test]
    fn report_label_shortens_critical_only() {
        assert_eq!(TriageLevel::CriticalRisk.report_label(), "CRITICAL");
        assert_eq!(TriageLevel::HighRisk.report_label(), "HIGH RISK");
        assert_eq!(TriageLevel::LowRisk.report_label(), "LOW RISK");
    }

    #[test]
    fn report_path_thresholds() {
        assert_eq!(
            from_vitals_probability(0.75).unwrap(),
            TriageLevel::CriticalRisk
        );
        assert_eq!(
            from_vitals_probability(0.74).unwrap(),
            TriageLevel::HighRisk
        );
        assert_eq!(
            from_vitals_probability(0.50).unwrap(),
            TriageLevel::HighRisk
        );
        assert_eq!(
            from_vitals_probability(0.30).unwrap(),
            TriageLevel::ModerateRisk
        );
        assert_eq!(
            from_vitals_probability(0.29).unwrap(),
            TriageLevel::LowRisk
        );
    }

    #[test]
    fn serde_uses_display_vocabulary() {
        assert_eq!(
            serde_json::to_string(&TriageLevel::CriticalRisk).unwrap(),
            "\"CRITICAL RISK\""
        );
        let parsed: TriageLevel = serde_json::from_str("\"MODERATE RISK\"").unwrap();
        assert_eq!(parsed, TriageLevel::ModerateRisk);
    }

    #[test]
    fn non_finite_score_is_rejected() {
        assert!(classify(f64::NAN).is_err());
        assert!(from_vitals_probability(f64::NEG_INFINITY).is_err());
    }
}
