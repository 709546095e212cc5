//! Agent desk routes.

use axum::extract::{Path, Query, State};
use axum::Json;
use database::Message;
use orchestrator::{OrchestratorError, QueueView, TicketDetail, TicketSummary};
use serde::Deserialize;

use super::chat::MessageRequest;
use crate::error::Result;
use crate::state::AppState;

/// Queue listing parameters.
#[derive(Deserialize)]
pub struct TicketQuery {
    /// `active` (default) or `closed`.
    pub view: Option<String>,
    /// Search over name, ticket id and email.
    pub q: Option<String>,
}

/// List tickets in a queue view.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TicketQuery>,
) -> Result<Json<Vec<TicketSummary>>> {
    let view = match query.view.as_deref() {
        Some(raw) => raw.parse::<QueueView>().map_err(OrchestratorError::from)?,
        None => QueueView::default(),
    };

    let tickets = state
        .orchestrator
        .list_tickets(view, query.q.as_deref())
        .await?;
    Ok(Json(tickets))
}

/// Open a ticket; the first open takes it over from the queue.
pub async fn open(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TicketDetail>> {
    let detail = state.orchestrator.open_ticket(&id).await?;
    Ok(Json(detail))
}

/// Post an agent reply.
pub async fn reply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<Message>> {
    let message = state.orchestrator.agent_reply(&id, &req.text).await?;
    Ok(Json(message))
}

/// Resolve a ticket.
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TicketSummary>> {
    let summary = state.orchestrator.close_ticket(&id).await?;
    Ok(Json(summary))
}
