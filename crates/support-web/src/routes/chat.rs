//! End-user chat routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::{Conversation, Status};
use orchestrator::{ConversationView, EscalationReceipt, Session, TurnOutcome};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::AppState;

/// A freshly started chat.
#[derive(Serialize)]
pub struct SessionCreated {
    pub conversation_id: String,
    pub ticket_id: String,
    pub status: Status,
}

/// Onboarding form.
#[derive(Deserialize)]
pub struct OnboardingRequest {
    pub name: String,
    pub email: String,
    pub concern: String,
}

/// A chat message from the user or an agent.
#[derive(Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// FAQ questions offered as buttons.
#[derive(Serialize)]
pub struct PresetList {
    pub questions: Vec<String>,
}

/// Start a conversation.
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>)> {
    let (_, conversation) = state.orchestrator.start_session().await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            conversation_id: conversation.id,
            ticket_id: conversation.ticket_id,
            status: conversation.status,
        }),
    ))
}

/// Submit the onboarding form.
pub async fn onboarding(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<OnboardingRequest>,
) -> Result<Json<Conversation>> {
    let session = Session::resume(id);
    let conversation = state
        .orchestrator
        .complete_onboarding(&session, &req.name, &req.email, &req.concern)
        .await?;
    Ok(Json(conversation))
}

/// Current chat screen.
pub async fn view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationView>> {
    let view = state.orchestrator.view(&Session::resume(id)).await?;
    Ok(Json(view))
}

/// Send a user message.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TurnOutcome>> {
    let outcome = state
        .orchestrator
        .handle_user_message(&Session::resume(id), &req.text)
        .await?;
    Ok(Json(outcome))
}

/// Confirm the escalation offer.
pub async fn escalate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EscalationReceipt>> {
    let receipt = state
        .orchestrator
        .request_escalation(&Session::resume(id))
        .await?;
    Ok(Json(receipt))
}

/// FAQ questions.
pub async fn presets(State(state): State<AppState>) -> Json<PresetList> {
    Json(PresetList {
        questions: state.orchestrator.preset_questions(),
    })
}
