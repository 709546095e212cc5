//! Route handlers for the support web server.

pub mod chat;
pub mod health;
pub mod tickets;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health))
        // End-user chat
        .route("/api/chat/presets", get(chat::presets))
        .route("/api/chat/sessions", post(chat::create_session))
        .route("/api/chat/sessions/:id", get(chat::view))
        .route("/api/chat/sessions/:id/onboarding", post(chat::onboarding))
        .route("/api/chat/sessions/:id/messages", post(chat::send_message))
        .route("/api/chat/sessions/:id/escalate", post(chat::escalate))
        // Agent desk
        .route("/api/agent/tickets", get(tickets::list))
        .route("/api/agent/tickets/:id", get(tickets::open))
        .route("/api/agent/tickets/:id/messages", post(tickets::reply))
        .route("/api/agent/tickets/:id/close", post(tickets::close))
}
