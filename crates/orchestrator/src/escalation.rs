//! Escalation detection over the latest automated reply.

use std::sync::Arc;

use database::{Message, Role};

use crate::prompt::{OFF_TOPIC_REPLY, UNSURE_REPLY};

/// Substrings that mark a reply as a refusal or as uncertain.
pub const DEFAULT_MARKERS: [&str; 5] = [
    "cannot assist",
    "can't assist",
    "not sure",
    "unable to help",
    "support agent",
];

/// Decides whether an automated reply is a refusal or an admission of doubt.
pub trait RefusalClassifier: Send + Sync {
    /// Whether `reply` should lead to an escalation offer.
    fn is_refusal(&self, reply: &str) -> bool;
}

/// Exact fallback phrases plus case-insensitive marker substrings.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    exact: Vec<String>,
    markers: Vec<String>,
}

impl Default for MarkerClassifier {
    fn default() -> Self {
        Self::new(
            [OFF_TOPIC_REPLY, UNSURE_REPLY],
            DEFAULT_MARKERS,
        )
    }
}

impl MarkerClassifier {
    /// Build a classifier from exact phrases and marker substrings.
    pub fn new<E, M>(exact: impl IntoIterator<Item = E>, markers: impl IntoIterator<Item = M>) -> Self
    where
        E: Into<String>,
        M: AsRef<str>,
    {
        Self {
            exact: exact.into_iter().map(Into::into).collect(),
            markers: markers
                .into_iter()
                .map(|marker| marker.as_ref().to_lowercase())
                .collect(),
        }
    }
}

impl RefusalClassifier for MarkerClassifier {
    fn is_refusal(&self, reply: &str) -> bool {
        let trimmed = reply.trim();
        if self.exact.iter().any(|phrase| phrase == trimmed) {
            return true;
        }
        let lowered = reply.to_lowercase();
        self.markers.iter().any(|marker| lowered.contains(marker))
    }
}

/// Looks at a conversation's history and says whether to offer a human.
#[derive(Clone)]
pub struct EscalationDetector {
    classifier: Arc<dyn RefusalClassifier>,
}

impl Default for EscalationDetector {
    fn default() -> Self {
        Self::new(MarkerClassifier::default())
    }
}

impl std::fmt::Debug for EscalationDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscalationDetector").finish_non_exhaustive()
    }
}

impl EscalationDetector {
    /// Create a detector around a classifier.
    pub fn new(classifier: impl RefusalClassifier + 'static) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    /// Whether a single reply reads as a refusal.
    pub fn is_refusal(&self, reply: &str) -> bool {
        self.classifier.is_refusal(reply)
    }

    /// An offer is due when the newest message is an `ai` reply that reads as a refusal.
    pub fn should_offer(&self, history: &[Message]) -> bool {
        match history.last() {
            Some(last) if last.role == Role::Ai => self.classifier.is_refusal(&last.content),
            _ => false,
        }
    }
}
