//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::{DatabaseError, Status, ValidationError};
use thiserror::Error;

/// Errors that can occur while driving a conversation.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Onboarding input was rejected; nothing was stored.
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The requested status change is not allowed from the current status.
    #[error("cannot move conversation from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    /// The conversation is closed and accepts no further input.
    #[error("conversation is closed")]
    ConversationClosed,

    /// Chat input arrived before onboarding completed.
    #[error("conversation is still onboarding")]
    AwaitingOnboarding,

    /// The user confirmed escalation but no offer was showing.
    #[error("no escalation offer is pending")]
    EscalationNotOffered,

    /// Conversation does not exist.
    #[error("conversation not found: {0}")]
    NotFound(String),

    /// Text generation failed; no reply was recorded.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// The store failed; the operation did not complete.
    #[error("store error: {0}")]
    Store(DatabaseError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<DatabaseError> for OrchestratorError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { id, .. } => OrchestratorError::NotFound(id),
            other => OrchestratorError::Store(other),
        }
    }
}
