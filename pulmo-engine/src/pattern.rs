//! Vitals pattern screen
//!
//! Quick scenario-band check used by the bedside simulator display:
//! how many of the six vitals sit inside the characteristic NORMAL or
//! PNEUMONIA ranges. Four or more matches classify the pattern; mixed
//! readings stay Borderline. This is a teaching aid, separate from the
//! probabilistic scoring paths.

use serde::{Deserialize, Serialize};

use crate::types::VitalsSnapshot;

/// Inclusive value band for one vital.
#[derive(Debug, Clone, Copy)]
struct Band {
    min: f64,
    max: f64,
}

impl Band {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Bands ordered: temperature, SpO2, heart rate, resp rate, cough,
/// retractions. Cough/retraction indicators are compared as 0/1 values.
const NORMAL_BANDS: [Band; 6] = [
    Band::new(36.5, 37.5),
    Band::new(95.0, 100.0),
    Band::new(80.0, 120.0),
    Band::new(20.0, 30.0),
    Band::new(0.0, 0.15),
    Band::new(0.0, 0.05),
];

const PNEUMONIA_BANDS: [Band; 6] = [
    Band::new(38.2, 40.0),
    Band::new(88.0, 94.0),
    Band::new(130.0, 160.0),
    Band::new(40.0, 60.0),
    Band::new(0.0, 0.85),
    Band::new(0.0, 0.75),
];

/// Minimum band matches required to claim a pattern.
const PATTERN_MATCH_COUNT: usize = 4;

/// Outcome of the pattern screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VitalsPattern {
    Normal,
    Pneumonia,
    Borderline,
}

impl VitalsPattern {
    /// Explanatory message shown with the pattern.
    pub fn message(&self) -> &'static str {
        match self {
            VitalsPattern::Normal => {
                "Normal Vital Pattern: All vital signs are within expected healthy ranges."
            }
            VitalsPattern::Pneumonia => {
                "Likely Pneumonia Pattern: Lower oxygen levels, faster breathing, and fever together are commonly seen in pneumonia."
            }
            VitalsPattern::Borderline => {
                "Borderline / Needs Clinical Correlation: Some vitals are outside normal ranges but don't clearly indicate pneumonia."
            }
        }
    }
}

fn band_matches(vitals: &VitalsSnapshot, bands: &[Band; 6]) -> usize {
    let values = [
        vitals.temperature_c,
        vitals.spo2_percent,
        vitals.heart_rate_bpm,
        vitals.resp_rate_bpm,
        f64::from(u8::from(vitals.cough)),
        f64::from(u8::from(vitals.retractions)),
    ];
    values
        .iter()
        .zip(bands.iter())
        .filter(|(value, band)| band.contains(**value))
        .count()
}

/// Classify a snapshot against the scenario bands.
///
/// Pneumonia is checked first, so a reading matching both scenarios
/// (possible because the indicator bands overlap) reports Pneumonia.
pub fn classify_pattern(vitals: &VitalsSnapshot) -> VitalsPattern {
    if band_matches(vitals, &PNEUMONIA_BANDS) >= PATTERN_MATCH_COUNT {
        VitalsPattern::Pneumonia
    } else if band_matches(vitals, &NORMAL_BANDS) >= PATTERN_MATCH_COUNT {
        VitalsPattern::Normal
    } else {
        VitalsPattern::Borderline
    }
}
