//! Append-only message log.

use sqlx::SqlitePool;

use crate::clock::{self, format_timestamp};
use crate::error::{DatabaseError, Result};
use crate::models::{Message, MessageRow, Role};

/// Append a message to a conversation.
pub async fn append_message(
    pool: &SqlitePool,
    conversation_id: &str,
    role: Role,
    content: &str,
) -> Result<Message> {
    let timestamp = format_timestamp(&clock::now());

    let row = sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (conversation_id, role, content, timestamp)
        VALUES (?, ?, ?, ?)
        RETURNING id, conversation_id, role, content, timestamp
        "#,
    )
    .bind(conversation_id)
    .bind(role.as_str())
    .bind(content)
    .bind(&timestamp)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_foreign_key_violation() {
                return DatabaseError::NotFound {
                    entity: "Conversation",
                    id: conversation_id.to_string(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    tracing::debug!(
        conversation_id = %conversation_id,
        role = %role,
        chars = content.len(),
        "Appended message"
    );

    Message::try_from(row)
}

/// List a conversation's messages in ascending timestamp order.
///
/// Identical timestamps fall back to insertion order.
pub async fn list_messages(pool: &SqlitePool, conversation_id: &str) -> Result<Vec<Message>> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT id, conversation_id, role, content, timestamp
        FROM messages
        WHERE conversation_id = ?
        ORDER BY timestamp ASC, id ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Message::try_from).collect()
}

/// Count messages in a conversation.
pub async fn count_messages(pool: &SqlitePool, conversation_id: &str) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages WHERE conversation_id = ?
        "#,
    )
    .bind(conversation_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
