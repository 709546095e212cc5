//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::request::GenerationRequest;

/// A trait for producing a single automated reply.
///
/// Implementations range from scripted test doubles to HTTP clients for
/// hosted models. This trait is object-safe and can be used with
/// `Arc<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Generate a reply for the given request.
    ///
    /// Returns the reply text, or an error if generation failed. Callers
    /// do not retry.
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError>;

    /// Get a human-readable name for this backend.
    fn name(&self) -> &str;

    /// Check if the backend is ready to generate.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}
