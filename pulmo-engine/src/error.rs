//! Engine error types

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by the fusion/triage engine
///
/// The engine is a leaf computation: it never catches or suppresses.
/// Every error propagates to the calling layer, which owns user-visible
/// messaging.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid input (probability out of range, non-finite vitals field)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
