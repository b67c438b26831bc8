//! Advisory protocols and age-adjusted interpretation
//!
//! Next-step protocols per triage level, refined by the dominant
//! physiological risk drivers; pediatric normal ranges per age bracket;
//! plain-language explanations for ranked model contributors. None of
//! this changes the triage level; it annotates a decision already made.

use serde::{Deserialize, Serialize};

use crate::confidence::validate_probability;
use crate::error::Result;
use crate::triage::TriageLevel;
use crate::types::{AgeGroup, VitalsSnapshot};

/// Base next-step protocol for a triage level.
pub fn base_protocol(level: TriageLevel) -> &'static [&'static str] {
    match level {
        TriageLevel::LowRisk => &[
            "Advise home monitoring and hydration",
            "Schedule follow-up within 24–48 hours",
        ],
        TriageLevel::ModerateRisk => &[
            "Perform additional diagnostic tests",
            "Monitor SpO₂ periodically",
        ],
        TriageLevel::HighRisk => &[
            "Initiate supportive respiratory therapy",
            "Monitor SpO₂ every 15–30 minutes",
        ],
        TriageLevel::CriticalRisk => &[
            "Initiate high-flow oxygen therapy",
            "Immediate senior clinician or ICU review",
        ],
    }
}

/// Refine the base protocol with steps targeting the dominant risk
/// drivers named in the risk-factor texts.
///
/// Duplicates are removed with order preserved. The triage level itself
/// is never altered here.
pub fn refine_protocol(level: TriageLevel, risk_factors: &[String]) -> Vec<String> {
    let mut steps: Vec<String> = base_protocol(level)
        .iter()
        .map(|s| s.to_string())
        .collect();

    let risk_text = risk_factors.join(" ").to_lowercase();

    if risk_text.contains("oxygen") || risk_text.contains("spo2") {
        steps.push("Continuous oxygen saturation monitoring".to_string());
    }
    if risk_text.contains("respiratory rate") || risk_text.contains("breathing") {
        steps.push("Assess work of breathing and chest retractions".to_string());
    }
    if risk_text.contains("temperature") || risk_text.contains("fever") {
        steps.push("Initiate antipyretic management as per protocol".to_string());
    }
    if risk_text.contains("heart rate") {
        steps.push("Monitor cardiac status and hydration".to_string());
    }

    let mut deduped = Vec::with_capacity(steps.len());
    for step in steps {
        if !deduped.contains(&step) {
            deduped.push(step);
        }
    }
    deduped
}

/// Normal pediatric ranges (inclusive) for the rate vitals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VitalNormals {
    /// Heart rate range in bpm
    pub heart_rate_bpm: (f64, f64),
    /// Respiratory rate range in breaths/min
    pub resp_rate_bpm: (f64, f64),
}

/// Normal ranges for an age bracket.
pub fn normals_for(age_group: AgeGroup) -> VitalNormals {
    match age_group {
        AgeGroup::Infant => VitalNormals {
            heart_rate_bpm: (100.0, 160.0),
            resp_rate_bpm: (30.0, 60.0),
        },
        AgeGroup::Toddler => VitalNormals {
            heart_rate_bpm: (90.0, 150.0),
            resp_rate_bpm: (24.0, 40.0),
        },
        AgeGroup::Preschool => VitalNormals {
            heart_rate_bpm: (80.0, 120.0),
            resp_rate_bpm: (22.0, 34.0),
        },
        AgeGroup::Child => VitalNormals {
            heart_rate_bpm: (70.0, 110.0),
            resp_rate_bpm: (18.0, 30.0),
        },
    }
}

/// Placement of a measured vital relative to its age-normal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeFlag {
    #[serde(rename = "High for age")]
    HighForAge,
    #[serde(rename = "Low for age")]
    LowForAge,
    #[serde(rename = "Normal for age")]
    NormalForAge,
}

impl AgeFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeFlag::HighForAge => "High for age",
            AgeFlag::LowForAge => "Low for age",
            AgeFlag::NormalForAge => "Normal for age",
        }
    }
}

impl std::fmt::Display for AgeFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age-adjusted interpretation of the rate vitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeAdjustedFlags {
    #[serde(rename = "HeartRate")]
    pub heart_rate: AgeFlag,
    #[serde(rename = "RespRate")]
    pub resp_rate: AgeFlag,
}

/// Interpret heart and respiratory rate against age-normal ranges.
pub fn age_adjusted_interpretation(
    vitals: &VitalsSnapshot,
    age_group: AgeGroup,
) -> AgeAdjustedFlags {
    let normals = normals_for(age_group);

    let flag = |value: f64, (low, high): (f64, f64)| {
        if value > high {
            AgeFlag::HighForAge
        } else if value < low {
            AgeFlag::LowForAge
        } else {
            AgeFlag::NormalForAge
        }
    };

    AgeAdjustedFlags {
        heart_rate: flag(vitals.heart_rate_bpm, normals.heart_rate_bpm),
        resp_rate: flag(vitals.resp_rate_bpm, normals.resp_rate_bpm),
    }
}

/// A ranked feature contribution from the external tabular model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    /// Wire name of the vitals feature (e.g. "SpO2_trend")
    pub feature: String,
    /// Signed contribution; positive pushes toward pneumonia risk
    pub contribution: f64,
}

/// Plain-language explanation for a feature pushing risk up or down.
///
/// Returns `None` for features outside the known vocabulary; callers
/// skip those.
pub fn feature_explanation(feature: &str, risk_up: bool) -> Option<&'static str> {
    let (up, down) = match feature {
        "HeartRate_trend" => (
            "Increasing heart rate over time suggests physiological stress",
            "Stable or decreasing heart rate reduces pneumonia concern",
        ),
        "RespRate_trend" => (
            "Increasing respiratory rate indicates worsening breathing effort",
            "Stable respiratory rate reduces respiratory distress concern",
        ),
        "Temperature_trend" => (
            "Rising body temperature suggests worsening infection",
            "Stable or falling temperature reduces infection concern",
        ),
        "SpO2_trend" => (
            "Declining oxygen saturation over time indicates hypoxemia",
            "Improving oxygen saturation reduces hypoxia concern",
        ),
        "HeartRate_bpm" => (
            "Elevated heart rate contributes to pneumonia risk",
            "Heart rate within normal range reduces risk",
        ),
        "RespRate_bpm" => (
            "Elevated respiratory rate increases pneumonia risk",
            "Respiratory rate within normal range reduces risk",
        ),
        "Temperature_C" => (
            "Fever contributes to pneumonia suspicion",
            "Normal body temperature reduces infection concern",
        ),
        "SpO2_percent" => (
            "Low oxygen saturation increases pneumonia risk",
            "Normal oxygen saturation reduces hypoxia concern",
        ),
        "Cough" => (
            "Presence of cough supports respiratory infection",
            "Absence of cough reduces respiratory infection concern",
        ),
        "Retractions" => (
            "Chest retractions indicate increased work of breathing",
            "No chest retractions reduce respiratory distress concern",
        ),
        _ => return None,
    };
    Some(if risk_up { up } else { down })
}

/// Convert ranked contributors into explanation sentences, skipping
/// unrecognized features.
pub fn explain_contributors(contributors: &[Contributor]) -> Vec<String> {
    contributors
        .iter()
        .filter_map(|c| feature_explanation(&c.feature, c.contribution > 0.0))
        .map(|s| s.to_string())
        .collect()
}

/// Band interpretation of the imaging probability for report text.
///
/// # Errors
/// Returns `EngineError::InvalidInput` if the probability is outside
/// [0, 1] or non-finite.
pub fn imaging_interpretation(imaging_probability: f64) -> Result<&'static str> {
    validate_probability("imaging_probability", imaging_probability)?;
    Ok(if imaging_probability >= 0.75 {
        "Chest X-ray findings are supportive of pneumonia risk."
    } else if imaging_probability <= 0.30 {
        "Chest X-ray findings do not strongly support pneumonia."
    } else {
        "Chest X-ray findings are inconclusive."
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_protocols_have_two_steps_each() {
        for level in [
            TriageLevel::LowRisk,
            TriageLevel::ModerateRisk,
            TriageLevel::HighRisk,
            TriageLevel::CriticalRisk,
        ] {
            assert_eq!(base_protocol(level).len(), 2);
        }
    }

    #[test]
    fn refinement_appends_driver_specific_steps() {
        let factors = vec![
            "Declining oxygen saturation".to_string(),
            "Increasing respiratory rate".to_string(),
            "Rising body temperature".to_string(),
        ];
        let steps = refine_protocol(TriageLevel::CriticalRisk, &factors);
        assert_eq!(
            steps,
            vec![
                "Initiate high-flow oxygen therapy",
                "Immediate senior clinician or ICU review",
                "Continuous oxygen saturation monitoring",
                "Assess work of breathing and chest retractions",
                "Initiate antipyretic management as per protocol",
            ]
        );
    }

    #[test]
    fn refinement_without_drivers_keeps_base_protocol() {
        let steps = refine_protocol(TriageLevel::LowRisk, &[]);
        assert_eq!(
            steps,
            vec![
                "Advise home monitoring and hydration",
                "Schedule follow-up within 24–48 hours",
            ]
        );
    }

    #[test]
    fn refinement_deduplicates_preserving_order() {
        // Two factors hitting the same oxygen keyword add the step once.
        let factors = vec![
            "Low SpO2 (oxygen saturation)".to_string(),
            "Declining oxygen saturation".to_string(),
        ];
        let steps = refine_protocol(TriageLevel::HighRisk, &factors);
        let oxygen_steps = steps
            .iter()
            .filter(|s| *s == "Continuous oxygen saturation monitoring")
            .count();
        assert_eq!(oxygen_steps, 1);
    }

    #[test]
    fn heart_rate_keyword_adds_cardiac_step() {
        let factors = vec!["Elevated heart rate".to_string()];
        let steps = refine_protocol(TriageLevel::ModerateRisk, &factors);
        assert!(steps.contains(&"Monitor cardiac status and hydration".to_string()));
    }

    #[test]
    fn age_flags_respect_bracket_ranges() {
        let vitals = VitalsSnapshot {
            heart_rate_bpm: 130.0,
            resp_rate_bpm: 38.0,
            ..VitalsSnapshot::default()
        };
        // High for a preschooler, normal for an infant.
        let preschool = age_adjusted_interpretation(&vitals, AgeGroup::Preschool);
        assert_eq!(preschool.heart_rate, AgeFlag::HighForAge);
        assert_eq!(preschool.resp_rate, AgeFlag::HighForAge);

        let infant = age_adjusted_interpretation(&vitals, AgeGroup::Infant);
        assert_eq!(infant.heart_rate, AgeFlag::NormalForAge);
        assert_eq!(infant.resp_rate, AgeFlag::NormalForAge);
    }

    #[test]
    fn low_rates_flag_low_for_age() {
        let vitals = VitalsSnapshot {
            heart_rate_bpm: 60.0,
            resp_rate_bpm: 12.0,
            ..VitalsSnapshot::default()
        };
        let flags = age_adjusted_interpretation(&vitals, AgeGroup::Child);
        assert_eq!(flags.heart_rate, AgeFlag::LowForAge);
        assert_eq!(flags.resp_rate, AgeFlag::LowForAge);
    }

    #[test]
    fn contributor_sign_selects_explanation() {
        let contributors = vec![
            Contributor {
                feature: "SpO2_trend".to_string(),
                contribution: 1.57,
            },
            Contributor {
                feature: "HeartRate_bpm".to_string(),
                contribution: -0.4,
            },
        ];
        let explanations = explain_contributors(&contributors);
        assert_eq!(
            explanations,
            vec![
                "Declining oxygen saturation over time indicates hypoxemia",
                "Heart rate within normal range reduces risk",
            ]
        );
    }

    #[test]
    fn unknown_contributor_features_are_skipped() {
        let contributors = vec![Contributor {
            feature: "Unknown_feature".to_string(),
            contribution: 2.0,
        }];
        assert!(explain_contributors(&contributors).is_empty());
    }

    #[test]
    fn imaging_interpretation_bands() {
        assert_eq!(
            imaging_interpretation(0.9).unwrap(),
            "Chest X-ray findings are supportive of pneumonia risk."
        );
        assert_eq!(
            imaging_interpretation(0.75).unwrap(),
            "Chest X-ray findings are supportive of pneumonia risk."
        );
        assert_eq!(
            imaging_interpretation(0.5).unwrap(),
            "Chest X-ray findings are inconclusive."
        );
        assert_eq!(
            imaging_interpretation(0.30).unwrap(),
            "Chest X-ray findings do not strongly support pneumonia."
        );
    }
}
