//! Probability and confidence primitives
//!
//! A model probability near 0.5 carries no diagnostic information;
//! confidence measures distance from that uninformative midpoint,
//! rescaled to [0, 1].

use crate::error::{EngineError, Result};

/// Confidence of a probability estimate: `|p - 0.5| * 2`.
///
/// 0.0 at p = 0.5, 1.0 at either extreme, symmetric around the midpoint.
/// The input must already be a valid probability; use
/// [`validate_probability`] at API boundaries.
pub fn confidence(p: f64) -> f64 {
    (p - 0.5).abs() * 2.0
}

/// Check that `p` is a finite value in [0, 1].
///
/// # Errors
/// Returns `EngineError::InvalidInput` naming the offending parameter.
pub fn validate_probability(name: &str, p: f64) -> Result<()> {
    if !p.is_finite() {
        return Err(EngineError::InvalidInput(format!(
            "{} is not a finite number: {}",
            name, p
        )));
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(EngineError::InvalidInput(format!(
            "{} out of range [0, 1]: {}",
            name, p
        )));
    }
    Ok(())
}
