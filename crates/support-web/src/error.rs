//! Error types for the support web server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use orchestrator::OrchestratorError;
use thiserror::Error;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum WebError {
    /// The state machine rejected or failed the operation.
    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::Orchestrator(err) => match err {
                OrchestratorError::Validation(_) => StatusCode::BAD_REQUEST,
                OrchestratorError::NotFound(_) => StatusCode::NOT_FOUND,
                OrchestratorError::InvalidTransition { .. }
                | OrchestratorError::ConversationClosed
                | OrchestratorError::AwaitingOnboarding
                | OrchestratorError::EscalationNotOffered => StatusCode::CONFLICT,
                OrchestratorError::Brain(_) => StatusCode::BAD_GATEWAY,
                OrchestratorError::Store(_) | OrchestratorError::Config(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "Request failed: {}", message);
        } else {
            tracing::debug!(status = status.as_u16(), "Request rejected: {}", message);
        }

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for route handlers.
pub type Result<T> = std::result::Result<T, WebError>;
