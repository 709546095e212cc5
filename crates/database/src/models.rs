//! Database models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::clock::parse_timestamp;
use crate::error::DatabaseError;
use crate::validation::ValidationError;

/// Routing status of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Waiting for name, email and concern.
    Onboarding,
    /// Answered by the automated agent.
    Bot,
    /// User asked for a person; no agent has opened the ticket yet.
    Escalated,
    /// An agent has opened the ticket.
    HumanActive,
    /// Resolved by an agent. Terminal.
    Closed,
}

impl Status {
    /// All statuses, in lifecycle order.
    pub const ALL: [Status; 5] = [
        Status::Onboarding,
        Status::Bot,
        Status::Escalated,
        Status::HumanActive,
        Status::Closed,
    ];

    /// Statuses shown in the agent's active queue.
    pub const ACTIVE_QUEUE: [Status; 2] = [Status::Escalated, Status::HumanActive];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Onboarding => "onboarding",
            Status::Bot => "bot",
            Status::Escalated => "escalated",
            Status::HumanActive => "human_active",
            Status::Closed => "closed",
        }
    }

    /// Whether a person is (or will be) handling the conversation.
    pub fn is_human_handled(&self) -> bool {
        matches!(self, Status::Escalated | Status::HumanActive)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DatabaseError::InvalidValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The end user.
    User,
    /// The automated agent.
    Ai,
    /// A human support agent.
    Human,
    /// Internal annotation, never shown in a thread view.
    System,
}

impl Role {
    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Ai => "ai",
            Role::Human => "human",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "ai" => Ok(Role::Ai),
            "human" => Ok(Role::Human),
            "system" => Ok(Role::System),
            other => Err(DatabaseError::InvalidValue {
                field: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Concern category picked during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concern {
    Inquiries,
    Partnerships,
    Others,
}

impl Concern {
    /// All categories, in the order the onboarding form lists them.
    pub const ALL: [Concern; 3] = [Concern::Inquiries, Concern::Partnerships, Concern::Others];

    /// Stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Concern::Inquiries => "Inquiries",
            Concern::Partnerships => "Partnerships",
            Concern::Others => "Others",
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Concern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if wanted.is_empty() {
            return Err(ValidationError::Empty("concern".to_string()));
        }
        Concern::ALL
            .into_iter()
            .find(|concern| concern.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::InvalidConcern(wanted.to_string()))
    }
}

/// A support conversation (one ticket).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// Opaque identifier (UUID v4).
    pub id: String,
    /// Human-readable ticket id, `SKY-YYYYMMDD-NNNN`.
    pub ticket_id: String,
    /// Current routing status.
    pub status: Status,
    /// Name collected during onboarding.
    pub user_name: Option<String>,
    /// Email collected during onboarding.
    pub user_email: Option<String>,
    /// Concern category collected during onboarding.
    pub concern: Option<String>,
    /// Creation time, UTC+8.
    pub created_at: DateTime<FixedOffset>,
}

/// A message in a conversation's append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning conversation.
    pub conversation_id: String,
    /// Author.
    pub role: Role,
    /// Free text.
    pub content: String,
    /// Creation time, UTC+8.
    pub timestamp: DateTime<FixedOffset>,
}

/// Raw `conversations` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ConversationRow {
    pub id: String,
    pub ticket_id: String,
    pub status: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub concern: Option<String>,
    pub created_at: String,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = DatabaseError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: row.status.parse()?,
            created_at: parse_timestamp(&row.created_at)?,
            id: row.id,
            ticket_id: row.ticket_id,
            user_name: row.user_name,
            user_email: row.user_email,
            concern: row.concern,
        })
    }
}

/// Raw `messages` row.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct MessageRow {
    pub id: i64,
    pub conversation_id: String,
    pub role: String,
    pub content: String,
    pub timestamp: String,
}

impl TryFrom<MessageRow> for Message {
    type Error = DatabaseError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        Ok(Self {
            role: row.role.parse()?,
            timestamp: parse_timestamp(&row.timestamp)?,
            id: row.id,
            conversation_id: row.conversation_id,
            content: row.content,
        })
    }
}
