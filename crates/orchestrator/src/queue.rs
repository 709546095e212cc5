//! Agent-side ticket projections.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use database::{Conversation, Status, ValidationError};
use serde::{Deserialize, Serialize};

use crate::session::ThreadMessage;

/// Which projection of the queue to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueView {
    /// Escalated and human-active tickets.
    #[default]
    Active,
    /// Resolved tickets.
    Closed,
}

impl QueueView {
    /// Statuses included in this view.
    pub fn statuses(&self) -> &'static [Status] {
        match self {
            QueueView::Active => &Status::ACTIVE_QUEUE,
            QueueView::Closed => &[Status::Closed],
        }
    }
}

impl fmt::Display for QueueView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueView::Active => f.write_str("active"),
            QueueView::Closed => f.write_str("closed"),
        }
    }
}

impl FromStr for QueueView {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(QueueView::Active),
            "closed" => Ok(QueueView::Closed),
            other => Err(ValidationError::Unknown {
                field: "view".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// One row of the agent queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketSummary {
    pub conversation_id: String,
    pub ticket_id: String,
    pub status: Status,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub concern: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

impl From<Conversation> for TicketSummary {
    fn from(conversation: Conversation) -> Self {
        Self {
            conversation_id: conversation.id,
            ticket_id: conversation.ticket_id,
            status: conversation.status,
            user_name: conversation.user_name,
            user_email: conversation.user_email,
            concern: conversation.concern,
            created_at: conversation.created_at,
        }
    }
}

/// A ticket opened by an agent: summary plus the visible thread.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    #[serde(flatten)]
    pub summary: TicketSummary,
    pub thread: Vec<ThreadMessage>,
}

/// Whether `conversation` matches a case-insensitive search over name,
/// ticket id and email. A blank query matches everything.
pub fn matches_query(conversation: &Conversation, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [
        conversation.user_name.as_deref(),
        Some(conversation.ticket_id.as_str()),
        conversation.user_email.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Filter an already-fetched projection, keeping its order.
pub fn filter_tickets(conversations: Vec<Conversation>, query: Option<&str>) -> Vec<TicketSummary> {
    conversations
        .into_iter()
        .filter(|conversation| query.map_or(true, |q| matches_query(conversation, q)))
        .map(TicketSummary::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::clock;

    fn convo(ticket: &str, name: Option<&str>, email: Option<&str>) -> Conversation {
        Conversation {
            id: format!("id-{}", ticket),
            ticket_id: ticket.to_string(),
            status: Status::Escalated,
            user_name: name.map(String::from),
            user_email: email.map(String::from),
            concern: Some("Inquiries".to_string()),
            created_at: clock::now(),
        }
    }

    #[test]
    fn test_view_statuses() {
        assert_eq!(QueueView::Active.statuses(), &[Status::Escalated, Status::HumanActive]);
        assert_eq!(QueueView::Closed.statuses(), &[Status::Closed]);
        assert_eq!("Closed".parse::<QueueView>().unwrap(), QueueView::Closed);
        assert!("pending".parse::<QueueView>().is_err());
    }

    #[test]
    fn test_matches_each_field() {
        let c = convo("SKY-20250105-0007", Some("Ana Cruz"), Some("ana@x.com"));
        assert!(matches_query(&c, "ana"));
        assert!(matches_query(&c, "CRUZ"));
        assert!(matches_query(&c, "0007"));
        assert!(matches_query(&c, "@x.COM"));
        assert!(matches_query(&c, "  "));
        assert!(!matches_query(&c, "bea"));
    }

    #[test]
    fn test_missing_fields_never_match() {
        let c = convo("SKY-20250105-0001", None, None);
        assert!(!matches_query(&c, "guest"));
        assert!(matches_query(&c, "sky-"));
    }

    #[test]
    fn test_filter_keeps_order() {
        let tickets = vec![
            convo("SKY-20250105-0003", Some("Ana"), Some("ana@x.com")),
            convo("SKY-20250105-0002", Some("Ben"), Some("ben@y.com")),
            convo("SKY-20250105-0001", Some("Ana Marie"), Some("am@z.com")),
        ];

        let hits = filter_tickets(tickets.clone(), Some("ana"));
        let ids: Vec<&str> = hits.iter().map(|t| t.ticket_id.as_str()).collect();
        assert_eq!(ids, vec!["SKY-20250105-0003", "SKY-20250105-0001"]);

        assert_eq!(filter_tickets(tickets, None).len(), 3);
    }
}
