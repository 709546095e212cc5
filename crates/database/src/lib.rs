//! SQLite persistence layer for the SkyPay support bridge.
//!
//! This crate stores conversations (one per support ticket) and their
//! append-only message logs using SQLx with SQLite. Every timestamp is
//! recorded in UTC+8.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, message, Database, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:support.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Open a ticket and log the first message
//!     let convo = conversation::create_conversation(db.pool()).await?;
//!     message::append_message(db.pool(), &convo.id, Role::User, "What is SkyPay?").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod conversation;
pub mod error;
pub mod message;
pub mod models;
pub mod ticket;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{Concern, Conversation, Message, Role, Status};
pub use ticket::format_ticket_id;
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/support.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_conversation_lifecycle() {
        let db = test_db().await;

        // Create
        let convo = conversation::create_conversation(db.pool()).await.unwrap();
        assert_eq!(convo.status, Status::Onboarding);
        assert!(convo.user_name.is_none());
        assert_eq!(convo.created_at.offset().local_minus_utc(), 8 * 3600);

        // Onboard
        conversation::complete_onboarding(db.pool(), &convo.id, "Ana", "Inquiries", "ana@x.com")
            .await
            .unwrap();
        let fetched = conversation::get_conversation(db.pool(), &convo.id)
            .await
            .unwrap();
        assert_eq!(fetched.status, Status::Bot);
        assert_eq!(fetched.user_name.as_deref(), Some("Ana"));
        assert_eq!(fetched.user_email.as_deref(), Some("ana@x.com"));
        assert_eq!(fetched.concern.as_deref(), Some("Inquiries"));

        // Onboarding details are write-once
        let again = conversation::complete_onboarding(
            db.pool(),
            &convo.id,
            "Other",
            "Others",
            "other@x.com",
        )
        .await;
        assert!(matches!(again, Err(DatabaseError::AlreadyExists { .. })));

        // Status update
        conversation::set_status(db.pool(), &convo.id, Status::Escalated)
            .await
            .unwrap();
        let fetched = conversation::get_conversation(db.pool(), &convo.id)
            .await
            .unwrap();
        assert_eq!(fetched.status, Status::Escalated);
        assert_eq!(fetched.user_name.as_deref(), Some("Ana"));
    }

    #[tokio::test]
    async fn test_ticket_ids_are_sequential() {
        let db = test_db().await;

        let first = conversation::create_conversation(db.pool()).await.unwrap();
        let second = conversation::create_conversation(db.pool()).await.unwrap();

        assert_eq!(
            first.ticket_id,
            format_ticket_id(first.created_at.date_naive(), 1)
        );
        assert!(second.ticket_id.starts_with("SKY-"));
        assert!(second.ticket_id.ends_with("-0002"));
        assert_ne!(first.id, second.id);

        assert_eq!(conversation::count_conversations(db.pool()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_taken_ticket_id_is_rejected() {
        let db = test_db().await;
        let first = conversation::create_conversation(db.pool()).await.unwrap();

        // Occupy the id the next creation would compute.
        let taken = format_ticket_id(first.created_at.date_naive(), 2);
        sqlx::query("UPDATE conversations SET ticket_id = ? WHERE id = ?")
            .bind(&taken)
            .bind(&first.id)
            .execute(db.pool())
            .await
            .unwrap();

        let result = conversation::create_conversation(db.pool()).await;
        assert!(matches!(
            result,
            Err(DatabaseError::AlreadyExists { entity: "Ticket", ref id }) if *id == taken
        ));
        assert_eq!(conversation::count_conversations(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ticket_sequence_follows_count() {
        let db = test_db().await;
        let first = conversation::create_conversation(db.pool()).await.unwrap();

        // The sequence comes from the row count, not from existing ids.
        let taken = format_ticket_id(first.created_at.date_naive(), 5);
        sqlx::query("UPDATE conversations SET ticket_id = ? WHERE id = ?")
            .bind(&taken)
            .bind(&first.id)
            .execute(db.pool())
            .await
            .unwrap();

        let second = conversation::create_conversation(db.pool()).await.unwrap();
        assert_eq!(
            second.ticket_id,
            format_ticket_id(second.created_at.date_naive(), 2)
        );
    }

    #[tokio::test]
    async fn test_missing_conversation() {
        let db = test_db().await;

        let result = conversation::get_conversation(db.pool(), "nope").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = conversation::set_status(db.pool(), "nope", Status::Closed).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result =
            conversation::complete_onboarding(db.pool(), "nope", "Ana", "Others", "a@x.com").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));

        let result = message::append_message(db.pool(), "nope", Role::User, "hi").await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_by_status_newest_first() {
        let db = test_db().await;

        let a = conversation::create_conversation(db.pool()).await.unwrap();
        let b = conversation::create_conversation(db.pool()).await.unwrap();
        let c = conversation::create_conversation(db.pool()).await.unwrap();

        conversation::set_status(db.pool(), &a.id, Status::Escalated)
            .await
            .unwrap();
        conversation::set_status(db.pool(), &b.id, Status::HumanActive)
            .await
            .unwrap();
        conversation::set_status(db.pool(), &c.id, Status::Closed)
            .await
            .unwrap();

        let active = conversation::list_by_status(db.pool(), &Status::ACTIVE_QUEUE)
            .await
            .unwrap();
        let ids: Vec<&str> = active.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![b.id.as_str(), a.id.as_str()]);

        let closed = conversation::list_by_status(db.pool(), &[Status::Closed])
            .await
            .unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, c.id);

        let none = conversation::list_by_status(db.pool(), &[]).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_messages_in_order() {
        let db = test_db().await;
        let convo = conversation::create_conversation(db.pool()).await.unwrap();

        message::append_message(db.pool(), &convo.id, Role::System, "User: Ana, Email: ana@x.com")
            .await
            .unwrap();
        message::append_message(db.pool(), &convo.id, Role::User, "What is SkyPay?")
            .await
            .unwrap();
        let reply = message::append_message(db.pool(), &convo.id, Role::Ai, "A fintech company.")
            .await
            .unwrap();
        assert_eq!(reply.role, Role::Ai);
        assert_eq!(reply.timestamp.offset().local_minus_utc(), 8 * 3600);

        let messages = message::list_messages(db.pool(), &convo.id).await.unwrap();
        let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Ai]);
        assert_eq!(messages[1].content, "What is SkyPay?");

        assert_eq!(message::count_messages(db.pool(), &convo.id).await.unwrap(), 3);

        // Other conversations are unaffected
        let other = conversation::create_conversation(db.pool()).await.unwrap();
        assert!(message::list_messages(db.pool(), &other.id)
            .await
            .unwrap()
            .is_empty());
    }
}
