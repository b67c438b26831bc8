//! Full assessment evaluation
//!
//! One entry point that runs the complete pipeline for a single set of
//! inputs and returns everything the presentation layer displays. The
//! engine is stateless: every call recomputes from the arguments alone.

use serde::{Deserialize, Serialize};

use crate::advisory;
use crate::confidence::validate_probability;
use crate::error::Result;
use crate::fusion::{self, FusionOutcome, CONFIDENCE_THRESHOLD};
use crate::heuristic;
use crate::risk_factors::{self, Abnormalities};
use crate::triage::{self, TriageLevel};
use crate::triangulation;
use crate::trust;
use crate::types::{AgeGroup, VitalsSnapshot};

const RATIONALE_HIGH_CONFIDENCE: &str = "High confidence imaging evidence combined with worsening physiological trends resulted in a critical risk classification.";
const RATIONALE_AMBIGUOUS_IMAGING: &str = "Due to ambiguous imaging evidence, the system relied more heavily on physiological deterioration to ensure patient safety.";

/// Where the vitals probability came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalsProbabilitySource {
    /// External tabular-risk model
    Model,
    /// Local fallback scorer
    Heuristic,
}

/// Complete result of one engine evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Imaging probability as supplied
    pub imaging_probability: f64,
    /// Vitals probability used for fusion
    pub vitals_probability: f64,
    /// Which path produced the vitals probability
    pub vitals_source: VitalsProbabilitySource,
    /// Gated fusion outcome
    pub fusion: FusionOutcome,
    /// Inter-model trust score
    pub trust_score: f64,
    /// Display band for the trust score
    pub trust_interpretation: String,
    /// Triggered risk factors, in emission order
    pub risk_factors: Vec<String>,
    /// Cross-modal triangulation narrative
    pub triangulation: String,
    /// Age-adjusted abnormality presence
    pub abnormalities: Abnormalities,
    /// Age-adjusted interpretation of the rate vitals
    pub age_adjusted_flags: advisory::AgeAdjustedFlags,
    /// Triage level from the fused score
    pub triage_level: TriageLevel,
    /// Recommended action for the level
    pub recommendation: String,
    /// Why the gate weighted the evidence the way it did
    pub decision_rationale: String,
}

/// Evaluate the full pipeline.
///
/// When `model_vitals_probability` is `Some`, the external model's
/// estimate is fused; otherwise the local fallback scorer supplies it.
/// The two paths are alternatives, never blended.
///
/// # Errors
/// Returns `EngineError::InvalidInput` on any out-of-range probability
/// or non-finite vitals field.
pub fn assess(
    imaging_probability: f64,
    vitals: &VitalsSnapshot,
    model_vitals_probability: Option<f64>,
    age_group: AgeGroup,
) -> Result<Assessment> {
    validate_probability("imaging_probability", imaging_probability)?;
    vitals.validate()?;

    let (vitals_probability, vitals_source) = match model_vitals_probability {
        Some(p) => {
            validate_probability("vitals_probability", p)?;
            (p, VitalsProbabilitySource::Model)
        }
        None => (
            heuristic::score_vitals(vitals)?,
            VitalsProbabilitySource::Heuristic,
        ),
    };

    let fusion = fusion::fuse(imaging_probability, vitals_probability)?;
    let trust_score = trust::trust_score(imaging_probability, vitals_probability)?;

    let factors = risk_factors::extract(vitals);
    let triangulation =
        triangulation::triangulate(imaging_probability, vitals_probability, &factors)?;

    let triage_level = triage::classify(fusion.final_score)?;

    let decision_rationale = if fusion.imaging_confidence >= CONFIDENCE_THRESHOLD {
        RATIONALE_HIGH_CONFIDENCE
    } else {
        RATIONALE_AMBIGUOUS_IMAGING
    };

    Ok(Assessment {
        imaging_probability,
        vitals_probability,
        vitals_source,
        trust_interpretation: trust::interpret(trust_score).to_string(),
        trust_score,
        risk_factors: factors.iter().map(|f| f.as_str().to_string()).collect(),
        triangulation: triangulation.to_string(),
        abnormalities: risk_factors::age_adjusted_abnormality(vitals),
        age_adjusted_flags: advisory::age_adjusted_interpretation(vitals, age_group),
        recommendation: triage_level.recommendation().to_string(),
        triage_level,
        decision_rationale: decision_rationale.to_string(),
        fusion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distressed_vitals() -> VitalsSnapshot {
        VitalsSnapshot {
            temperature_c: 38.2,
            temperature_trend: 0.7,
            spo2_percent: 92.0,
            spo2_trend: -2.5,
            heart_rate_bpm: 130.0,
            heart_rate_trend: 10.0,
            resp_rate_bpm: 38.0,
            resp_rate_trend: 8.0,
            cough: true,
            retractions: true,
        }
    }

    #[test]
    fn heuristic_path_used_when_no_model_probability() {
        let result = assess(0.9, &distressed_vitals(), None, AgeGroup::Preschool).unwrap();
        assert_eq!(result.vitals_source, VitalsProbabilitySource::Heuristic);
        // All signals abnormal: heuristic saturates at 1.0
        assert_eq!(result.vitals_probability, 1.0);
    }

    #[test]
    fn model_path_used_when_probability_supplied() {
        let result =
            assess(0.9, &distressed_vitals(), Some(0.8), AgeGroup::Preschool).unwrap();
        assert_eq!(result.vitals_source, VitalsProbabilitySource::Model);
        assert_eq!(result.vitals_probability, 0.8);
    }

    #[test]
    fn distressed_patient_assesses_critical() {
        let result = assess(0.95, &distressed_vitals(), None, AgeGroup::Preschool).unwrap();
        // 0.6 * 0.95 + 0.4 * 1.0 = 0.97, vitals corroborate so no cap
        assert_eq!(result.triage_level, TriageLevel::CriticalRisk);
        assert!(!result.fusion.safety_cap_applied);
        assert_eq!(result.recommendation, "Immediate intervention");
        assert_eq!(result.abnormalities, Abnormalities::Present);
    }

    #[test]
    fn rationale_tracks_imaging_confidence() {
        let confident = assess(0.95, &distressed_vitals(), None, AgeGroup::Preschool).unwrap();
        assert!(confident.decision_rationale.contains("High confidence"));

        let ambiguous = assess(0.55, &distressed_vitals(), None, AgeGroup::Preschool).unwrap();
        assert!(ambiguous.decision_rationale.contains("ambiguous imaging"));
    }

    #[test]
    fn healthy_patient_assesses_low_risk() {
        let result = assess(
            0.05,
            &VitalsSnapshot::default(),
            None,
            AgeGroup::Preschool,
        )
        .unwrap();
        assert_eq!(result.triage_level, TriageLevel::LowRisk);
        assert!(result.risk_factors.is_empty());
        assert_eq!(result.abnormalities, Abnormalities::Absent);
        assert_eq!(
            result.triangulation,
            "No strong concordance between imaging and physiological indicators."
        );
    }

    #[test]
    fn assessment_is_deterministic() {
        let a = assess(0.77, &distressed_vitals(), Some(0.66), AgeGroup::Toddler).unwrap();
        let b = assess(0.77, &distressed_vitals(), Some(0.66), AgeGroup::Toddler).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_model_probability_is_rejected() {
        assert!(assess(0.5, &distressed_vitals(), Some(1.5), AgeGroup::Child).is_err());
    }

    #[test]
    fn assessment_serializes_for_the_api() {
        let result = assess(0.9, &distressed_vitals(), None, AgeGroup::Preschool).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["vitals_source"], "heuristic");
        assert_eq!(json["triage_level"], "CRITICAL RISK");
        assert!(json["fusion"]["final_score"].is_number());
    }
}
