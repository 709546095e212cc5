//! Error types for generation backends.

use thiserror::Error;

/// Errors that can occur while generating a reply.
///
/// None of these are retried by callers; the user may resubmit instead.
#[derive(Debug, Error)]
pub enum BrainError {
    /// The backend is misconfigured (missing key, bad URL).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request never got a response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an error or a malformed body.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// A timeout occurred during generation.
    #[error("generation timed out")]
    Timeout,

    /// The backend is temporarily unavailable.
    #[error("brain unavailable: {0}")]
    Unavailable(String),
}
