//! End-user session handle and the chat screen projection.

use chrono::{DateTime, FixedOffset};
use database::{Conversation, Message, Role, Status};
use serde::{Deserialize, Serialize};

/// Prompt shown with the escalation button.
pub const ESCALATION_OFFER_TEXT: &str =
    "I didn't quite get that. Would you like to talk to a Support Agent?";

/// Banner shown while a person handles the chat.
pub const HUMAN_HANDOFF_NOTICE: &str =
    "This chat is escalated to a Support Agent (9AM - 6PM).";

/// Identifies the conversation an end user is talking in.
///
/// Passed explicitly into every chat operation; nothing about the session
/// is cached between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    conversation_id: String,
}

impl Session {
    /// Resume a session for an existing conversation.
    pub fn resume(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
        }
    }

    /// The conversation this session talks in.
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }
}

/// A message as shown in a thread. System annotations are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl ThreadMessage {
    /// Visible messages of a log, in order.
    pub fn visible(messages: Vec<Message>) -> Vec<ThreadMessage> {
        messages
            .into_iter()
            .filter(|message| message.role != Role::System)
            .map(|message| ThreadMessage {
                role: message.role,
                content: message.content,
                timestamp: message.timestamp,
            })
            .collect()
    }
}

/// What the end-user chat screen shows.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationView {
    pub conversation_id: String,
    pub ticket_id: String,
    pub status: Status,
    pub user_name: Option<String>,
    pub thread: Vec<ThreadMessage>,
    /// Whether the "talk to a support agent" offer is showing.
    pub offer_escalation: bool,
    /// Text accompanying the offer, when shown.
    pub escalation_prompt: Option<&'static str>,
    /// Whether the input box accepts messages.
    pub accepts_input: bool,
    /// Whether a person handles (or will handle) the chat.
    pub human_handling: bool,
    /// Banner text while a person handles the chat.
    pub notice: Option<&'static str>,
}

impl ConversationView {
    /// Project a conversation and its log. `offer_escalation` comes from the detector.
    pub fn build(conversation: Conversation, messages: Vec<Message>, offer_escalation: bool) -> Self {
        let status = conversation.status;
        let offer_escalation = offer_escalation && status == Status::Bot;
        let human_handling = status.is_human_handled();

        Self {
            conversation_id: conversation.id,
            ticket_id: conversation.ticket_id,
            status,
            user_name: conversation.user_name,
            thread: ThreadMessage::visible(messages),
            offer_escalation,
            escalation_prompt: offer_escalation.then_some(ESCALATION_OFFER_TEXT),
            accepts_input: !matches!(status, Status::Closed | Status::Onboarding),
            human_handling,
            notice: human_handling.then_some(HUMAN_HANDOFF_NOTICE),
        }
    }
}

/// Where an automated reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Canned FAQ answer.
    Preset,
    /// Fixed refusal for unrelated questions.
    OffTopic,
    /// Produced by the brain.
    Generated,
    /// No automated reply; a person handles the chat.
    Relayed,
}

/// Result of one user message.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The stored user message.
    pub message: Message,
    /// The stored automated reply, if any.
    pub reply: Option<Message>,
    pub kind: ReplyKind,
    /// Whether the reply should be followed by the escalation offer.
    pub offer_escalation: bool,
    pub status: Status,
}

/// Result of a confirmed escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscalationReceipt {
    pub ticket_id: String,
    pub status: Status,
    /// Whether the operations inbox was reached. The transition stands either way.
    pub notified: bool,
}
