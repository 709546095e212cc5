//! Failing brain implementation - every call errors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};

/// Which error a [`FailingBrain`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    ProcessingFailed,
    Timeout,
    Unavailable,
}

/// A brain whose every `generate` call fails.
///
/// Clones share the call counter.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    kind: FailureKind,
    calls: Arc<AtomicUsize>,
}

impl Default for FailingBrain {
    fn default() -> Self {
        Self::new(FailureKind::Unavailable)
    }
}

impl FailingBrain {
    /// Create a brain that fails with the given kind of error.
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, BrainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Err(match self.kind {
            FailureKind::Network => BrainError::Network("connection refused".to_string()),
            FailureKind::ProcessingFailed => {
                BrainError::ProcessingFailed("API error (500): upstream".to_string())
            }
            FailureKind::Timeout => BrainError::Timeout,
            FailureKind::Unavailable => BrainError::Unavailable("mock outage".to_string()),
        })
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }

    async fn is_ready(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let brain = FailingBrain::new(FailureKind::Timeout);
        let handle = brain.clone();

        let result = brain.generate(GenerationRequest::new("rules", "hi")).await;
        assert!(matches!(result, Err(BrainError::Timeout)));

        let result = brain.generate(GenerationRequest::new("rules", "hi")).await;
        assert!(result.is_err());
        assert_eq!(handle.calls(), 2);
    }

    #[tokio::test]
    async fn test_not_ready() {
        assert!(!FailingBrain::default().is_ready().await);
    }
}
