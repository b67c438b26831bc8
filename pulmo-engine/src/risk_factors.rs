//! Risk factor extraction from the vitals snapshot
//!
//! Deterministic threshold checks over a fixed vocabulary. Emission
//! order is significant: the triangulation narrative and the display
//! layer both consume the list as-is.

use serde::{Deserialize, Serialize};

use crate::types::VitalsSnapshot;

/// One of the six recognized risk findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactor {
    LowSpo2,
    ElevatedRespRate,
    ElevatedHeartRate,
    Fever,
    Cough,
    Retractions,
}

impl RiskFactor {
    /// Display string for this finding.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskFactor::LowSpo2 => "Low SpO2 (oxygen saturation)",
            RiskFactor::ElevatedRespRate => "Elevated respiratory rate",
            RiskFactor::ElevatedHeartRate => "Elevated heart rate",
            RiskFactor::Fever => "Fever",
            RiskFactor::Cough => "Cough present",
            RiskFactor::Retractions => "Chest retractions present",
        }
    }
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age-adjusted abnormality presence, reported as a single flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Abnormalities {
    Present,
    Absent,
}

impl Abnormalities {
    pub fn as_str(&self) -> &'static str {
        match self {
            Abnormalities::Present => "Present",
            Abnormalities::Absent => "Absent",
        }
    }
}

impl std::fmt::Display for Abnormalities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extract triggered risk factors in fixed order.
pub fn extract(vitals: &VitalsSnapshot) -> Vec<RiskFactor> {
    let mut factors = Vec::new();
    if vitals.spo2_percent < 95.0 {
        factors.push(RiskFactor::LowSpo2);
    }
    if vitals.resp_rate_bpm > 28.0 {
        factors.push(RiskFactor::ElevatedRespRate);
    }
    if vitals.heart_rate_bpm > 100.0 {
        factors.push(RiskFactor::ElevatedHeartRate);
    }
    if vitals.temperature_c > 38.0 {
        factors.push(RiskFactor::Fever);
    }
    if vitals.cough {
        factors.push(RiskFactor::Cough);
    }
    if vitals.retractions {
        factors.push(RiskFactor::Retractions);
    }
    factors
}

/// Whether any of the threshold vitals is abnormal for age.
///
/// Same thresholds as [`extract`], collapsed into one boolean for the
/// gate-inputs display.
pub fn age_adjusted_abnormality(vitals: &VitalsSnapshot) -> Abnormalities {
    let abnormal = vitals.spo2_percent < 95.0
        || vitals.resp_rate_bpm > 28.0
        || vitals.heart_rate_bpm > 100.0
        || vitals.temperature_c > 38.0;
    if abnormal {
        Abnormalities::Present
    } else {
        Abnormalities::Absent
    }
}
