//! Conversation CRUD operations.

use chrono::{DateTime, FixedOffset};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::clock::{self, format_timestamp};
use crate::error::{DatabaseError, Result};
use crate::models::{Conversation, ConversationRow, Status};
use crate::ticket::format_ticket_id;

const CONVERSATION_COLUMNS: &str =
    "id, ticket_id, status, user_name, user_email, concern, created_at";

/// Attempts at a free ticket sequence before giving up.
const CREATE_ATTEMPTS: usize = 8;

/// Create a new conversation in `onboarding` with a fresh ticket id.
///
/// The sequence is the number of existing conversations plus one. The
/// UNIQUE `ticket_id` rejects an id a concurrent creation took first; the
/// count is then re-read and the insert retried.
pub async fn create_conversation(pool: &SqlitePool) -> Result<Conversation> {
    let id = Uuid::new_v4().to_string();

    let mut attempt = 1;
    loop {
        let created_at = clock::now();
        let sequence = count_conversations(pool).await? + 1;
        let ticket_id = format_ticket_id(created_at.date_naive(), sequence);

        match insert_conversation(pool, &id, &ticket_id, &created_at).await {
            Err(DatabaseError::AlreadyExists { .. }) if attempt < CREATE_ATTEMPTS => {
                tracing::debug!(ticket_id = %ticket_id, attempt, "Ticket id taken, recounting");
                attempt += 1;
            }
            Err(e) => return Err(e),
            Ok(conversation) => {
                tracing::info!(
                    conversation_id = %conversation.id,
                    ticket_id = %conversation.ticket_id,
                    "Created conversation"
                );
                return Ok(conversation);
            }
        }
    }
}

async fn insert_conversation(
    pool: &SqlitePool,
    id: &str,
    ticket_id: &str,
    created_at: &DateTime<FixedOffset>,
) -> Result<Conversation> {
    let row = sqlx::query_as::<_, ConversationRow>(&format!(
        r#"
        INSERT INTO conversations (id, ticket_id, status, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING {CONVERSATION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(ticket_id)
    .bind(Status::Onboarding.as_str())
    .bind(format_timestamp(created_at))
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Ticket",
                    id: ticket_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Conversation::try_from(row)
}

/// Record onboarding details and move the conversation to `bot`.
///
/// Only applies to conversations still in `onboarding`; details are
/// immutable afterwards.
pub async fn complete_onboarding(
    pool: &SqlitePool,
    id: &str,
    name: &str,
    concern: &str,
    email: &str,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET user_name = ?, concern = ?, user_email = ?, status = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(name)
    .bind(concern)
    .bind(email)
    .bind(Status::Bot.as_str())
    .bind(id)
    .bind(Status::Onboarding.as_str())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        // Distinguish a missing conversation from a repeated onboarding.
        get_conversation(pool, id).await?;
        return Err(DatabaseError::AlreadyExists {
            entity: "Onboarding",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Get a conversation by ID.
pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Conversation> {
    let row = sqlx::query_as::<_, ConversationRow>(&format!(
        r#"
        SELECT {CONVERSATION_COLUMNS}
        FROM conversations
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Conversation",
        id: id.to_string(),
    })?;

    Conversation::try_from(row)
}

/// Overwrite a conversation's status.
pub async fn set_status(pool: &SqlitePool, id: &str, status: Status) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET status = ?
        WHERE id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Conversation",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List conversations whose status is in `statuses`, newest first.
pub async fn list_by_status(pool: &SqlitePool, statuses: &[Status]) -> Result<Vec<Conversation>> {
    if statuses.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = vec!["?"; statuses.len()].join(", ");
    let sql = format!(
        r#"
        SELECT {CONVERSATION_COLUMNS}
        FROM conversations
        WHERE status IN ({placeholders})
        ORDER BY created_at DESC, rowid DESC
        "#
    );

    let mut query = sqlx::query_as::<_, ConversationRow>(&sql);
    for status in statuses {
        query = query.bind(status.as_str());
    }
    let rows = query.fetch_all(pool).await?;

    rows.into_iter().map(Conversation::try_from).collect()
}

/// Count total conversations.
pub async fn count_conversations(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM conversations
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(count)
}
