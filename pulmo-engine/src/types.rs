//! Vital sign domain types
//!
//! Field names and encodings match the JSON contract of the external
//! tabular-risk model: ten fields, with cough and chest retractions
//! carried as 0/1 integers on the wire.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A snapshot of physiological readings for one patient at one moment.
///
/// Snapshots are owned by the caller (user input or a simulated stream)
/// and read once per evaluation. The engine never retains one across
/// calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    /// Body temperature in °C
    #[serde(rename = "Temperature_C")]
    pub temperature_c: f64,
    /// Instantaneous temperature trend (°C per sampling interval)
    #[serde(rename = "Temperature_trend")]
    pub temperature_trend: f64,
    /// Oxygen saturation in percent
    #[serde(rename = "SpO2_percent")]
    pub spo2_percent: f64,
    /// Instantaneous SpO2 trend
    #[serde(rename = "SpO2_trend")]
    pub spo2_trend: f64,
    /// Heart rate in beats per minute
    #[serde(rename = "HeartRate_bpm")]
    pub heart_rate_bpm: f64,
    /// Instantaneous heart rate trend
    #[serde(rename = "HeartRate_trend")]
    pub heart_rate_trend: f64,
    /// Respiratory rate in breaths per minute
    #[serde(rename = "RespRate_bpm")]
    pub resp_rate_bpm: f64,
    /// Instantaneous respiratory rate trend
    #[serde(rename = "RespRate_trend")]
    pub resp_rate_trend: f64,
    /// Cough present
    #[serde(rename = "Cough", with = "binary_flag")]
    pub cough: bool,
    /// Chest retractions present
    #[serde(rename = "Retractions", with = "binary_flag")]
    pub retractions: bool,
}

impl VitalsSnapshot {
    /// Validate that every numeric field is finite.
    ///
    /// # Errors
    /// Returns `EngineError::InvalidInput` naming the first offending
    /// field. Range checks are deliberately not applied here: the
    /// scoring thresholds themselves define what "abnormal" means.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("Temperature_C", self.temperature_c),
            ("Temperature_trend", self.temperature_trend),
            ("SpO2_percent", self.spo2_percent),
            ("SpO2_trend", self.spo2_trend),
            ("HeartRate_bpm", self.heart_rate_bpm),
            ("HeartRate_trend", self.heart_rate_trend),
            ("RespRate_bpm", self.resp_rate_bpm),
            ("RespRate_trend", self.resp_rate_trend),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(EngineError::InvalidInput(format!(
                    "Vitals field {} is not a finite number: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for VitalsSnapshot {
    /// Resting readings for a healthy pediatric patient.
    fn default() -> Self {
        Self {
            temperature_c: 37.0,
            temperature_trend: 0.0,
            spo2_percent: 98.0,
            spo2_trend: 0.0,
            heart_rate_bpm: 100.0,
            heart_rate_trend: 0.0,
            resp_rate_bpm: 25.0,
            resp_rate_trend: 0.0,
            cough: false,
            retractions: false,
        }
    }
}

/// Pediatric age bracket used for age-adjusted interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    /// 0–1 years
    Infant,
    /// 1–3 years
    Toddler,
    /// 4–6 years
    Preschool,
    /// 7–12 years
    Child,
}

impl AgeGroup {
    /// Wire label used by the external tabular-risk service.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Infant => "infant",
            AgeGroup::Toddler => "toddler",
            AgeGroup::Preschool => "preschool",
            AgeGroup::Child => "child",
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize bool indicators as the 0/1 integers the model contract uses.
mod binary_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(serde::de::Error::custom(format!(
                "indicator must be 0 or 1, got {}",
                other
            ))),
        }
    }
}
