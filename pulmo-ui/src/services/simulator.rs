//! Simulated vitals data stream
//!
//! Scenario-driven random walk inside per-vital value bands. Each step
//! nudges every vital within its active scenario band and derives the
//! trend fields from the step deltas, so the stream looks like a
//! monitor feed rather than independent random draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use pulmo_engine::VitalsSnapshot;

/// Simulation scenario selecting the value bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Normal,
    Pneumonia,
}

/// Inclusive band for one vital under a scenario.
#[derive(Debug, Clone, Copy)]
struct Band {
    min: f64,
    max: f64,
}

impl Band {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Bands ordered: temperature, SpO2, heart rate, resp rate, cough
/// likelihood, retraction likelihood.
fn bands(scenario: Scenario) -> [Band; 6] {
    match scenario {
        Scenario::Normal => [
            Band::new(36.5, 37.5),
            Band::new(95.0, 100.0),
            Band::new(80.0, 120.0),
            Band::new(20.0, 30.0),
            Band::new(0.0, 0.15),
            Band::new(0.0, 0.05),
        ],
        Scenario::Pneumonia => [
            Band::new(38.2, 40.0),
            Band::new(88.0, 94.0),
            Band::new(130.0, 160.0),
            Band::new(40.0, 60.0),
            Band::new(0.0, 0.85),
            Band::new(0.0, 0.75),
        ],
    }
}

/// Fraction of the band width a single step may move.
const STEP_FRACTION: f64 = 0.25;
/// Indicator likelihood above this threshold reports the finding present.
const INDICATOR_THRESHOLD: f64 = 0.5;

/// Simulated vitals stream state.
pub struct VitalsSimulator {
    scenario: Scenario,
    rng: StdRng,
    // Continuous values walked per step; indicators kept as likelihoods
    // so they can drift before crossing the presence threshold.
    values: [f64; 6],
}

impl VitalsSimulator {
    /// New simulator in the normal scenario, seeded from entropy.
    pub fn new() -> Self {
        Self::seeded(Scenario::Normal, rand::random())
    }

    /// New simulator with a fixed seed, for reproducible streams.
    pub fn seeded(scenario: Scenario, seed: u64) -> Self {
        let values = bands(scenario).map(|b| b.midpoint());
        Self {
            scenario,
            rng: StdRng::seed_from_u64(seed),
            values,
        }
    }

    /// Current scenario.
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Switch scenario; values jump to the new band midpoints so the
    /// next steps walk inside the right ranges.
    pub fn set_scenario(&mut self, scenario: Scenario) {
        if self.scenario != scenario {
            self.scenario = scenario;
            self.values = bands(scenario).map(|b| b.midpoint());
        }
    }

    /// Advance the stream one step and return the resulting snapshot.
    pub fn step(&mut self) -> VitalsSnapshot {
        let bands = bands(self.scenario);
        let mut deltas = [0.0; 6];

        for (i, band) in bands.iter().enumerate() {
            let width = band.max - band.min;
            let step = if width > 0.0 {
                self.rng.gen_range(-width * STEP_FRACTION..=width * STEP_FRACTION)
            } else {
                0.0
            };
            let next = (self.values[i] + step).clamp(band.min, band.max);
            deltas[i] = next - self.values[i];
            self.values[i] = next;
        }

        VitalsSnapshot {
            temperature_c: round1(self.values[0]),
            temperature_trend: round1(deltas[0]),
            spo2_percent: self.values[1].round(),
            spo2_trend: round1(deltas[1]),
            heart_rate_bpm: self.values[2].round(),
            heart_rate_trend: round1(deltas[2]),
            resp_rate_bpm: self.values[3].round(),
            resp_rate_trend: round1(deltas[3]),
            cough: self.values[4] > INDICATOR_THRESHOLD,
            retractions: self.values[5] > INDICATOR_THRESHOLD,
        }
    }
}

impl Default for VitalsSimulator {
    fn default() -> Self {
        Self::new()
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulmo_engine::pattern::{classify_pattern, VitalsPattern};

    #[test]
    fn normal_stream_stays_in_band() {
        let mut sim = VitalsSimulator::seeded(Scenario::Normal, 7);
        for _ in 0..50 {
            let snapshot = sim.step();
            assert!((36.5..=37.5).contains(&snapshot.temperature_c));
            assert!((95.0..=100.0).contains(&snapshot.spo2_percent));
            assert!((80.0..=120.0).contains(&snapshot.heart_rate_bpm));
            assert!((20.0..=30.0).contains(&snapshot.resp_rate_bpm));
            assert!(!snapshot.cough);
            assert!(!snapshot.retractions);
        }
    }

    #[test]
    fn pneumonia_stream_matches_pneumonia_pattern() {
        let mut sim = VitalsSimulator::seeded(Scenario::Pneumonia, 7);
        for _ in 0..50 {
            let snapshot = sim.step();
            assert_eq!(classify_pattern(&snapshot), VitalsPattern::Pneumonia);
        }
    }

    #[test]
    fn seeded_streams_are_reproducible() {
        let mut a = VitalsSimulator::seeded(Scenario::Pneumonia, 42);
        let mut b = VitalsSimulator::seeded(Scenario::Pneumonia, 42);
        for _ in 0..10 {
            assert_eq!(a.step(), b.step());
        }
    }

    #[test]
    fn scenario_switch_resets_to_new_bands() {
        let mut sim = VitalsSimulator::seeded(Scenario::Normal, 1);
        sim.step();
        sim.set_scenario(Scenario::Pneumonia);
        let snapshot = sim.step();
        assert!(snapshot.temperature_c >= 38.2);
        assert!(snapshot.spo2_percent <= 94.0);
    }

    #[test]
    fn snapshots_validate_for_the_engine() {
        let mut sim = VitalsSimulator::seeded(Scenario::Pneumonia, 3);
        for _ in 0..20 {
            assert!(sim.step().validate().is_ok());
        }
    }
}
