//! # PulmoTriage Engine
//!
//! Pure, stateless evidence-fusion and triage-decision engine for the
//! PulmoTriage clinical-education simulator. Combines an imaging
//! probability (chest X-ray classifier) and a vitals probability
//! (external tabular model, or the local fallback scorer) into a fused
//! risk score, a trust/agreement score, a triage level, and the
//! explanation strings the UI renders.
//!
//! Every function here is a deterministic, side-effect-free computation
//! over its inputs: no I/O, no retained state, safe to call repeatedly
//! and concurrently. Inputs are owned by the caller and read once per
//! evaluation.

pub mod advisory;
pub mod assessment;
pub mod confidence;
pub mod error;
pub mod fusion;
pub mod heuristic;
pub mod pattern;
pub mod risk_factors;
pub mod triage;
pub mod triangulation;
pub mod trust;
pub mod types;

pub use assessment::{assess, Assessment, VitalsProbabilitySource};
pub use error::{EngineError, Result};
pub use fusion::{fuse, FusionOutcome, CONFIDENCE_THRESHOLD};
pub use risk_factors::{Abnormalities, RiskFactor};
pub use triage::TriageLevel;
pub use types::{AgeGroup, VitalsSnapshot};
