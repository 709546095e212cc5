//! Conversation store contract.

use async_trait::async_trait;
use database::{conversation, message, Conversation, Database, Message, Role, Status};

/// Persistence consumed by the state machine.
///
/// The store is the single source of truth for status and message order;
/// callers re-read it on every request instead of caching.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Allocate a conversation in `onboarding` with a fresh ticket id.
    async fn create_conversation(&self) -> database::Result<Conversation>;

    /// Record onboarding details and move to `bot`.
    async fn complete_onboarding(
        &self,
        id: &str,
        name: &str,
        concern: &str,
        email: &str,
    ) -> database::Result<()>;

    /// Append a message to the log.
    async fn append_message(&self, id: &str, role: Role, content: &str)
        -> database::Result<Message>;

    /// All messages, ascending by timestamp.
    async fn list_messages(&self, id: &str) -> database::Result<Vec<Message>>;

    /// Fetch a conversation.
    async fn get_conversation(&self, id: &str) -> database::Result<Conversation>;

    /// Overwrite the status.
    async fn set_status(&self, id: &str, status: Status) -> database::Result<()>;

    /// Conversations in any of `statuses`, newest first.
    async fn list_by_status(&self, statuses: &[Status]) -> database::Result<Vec<Conversation>>;
}

#[async_trait]
impl ConversationStore for Database {
    async fn create_conversation(&self) -> database::Result<Conversation> {
        conversation::create_conversation(self.pool()).await
    }

    async fn complete_onboarding(
        &self,
        id: &str,
        name: &str,
        concern: &str,
        email: &str,
    ) -> database::Result<()> {
        conversation::complete_onboarding(self.pool(), id, name, concern, email).await
    }

    async fn append_message(
        &self,
        id: &str,
        role: Role,
        content: &str,
    ) -> database::Result<Message> {
        message::append_message(self.pool(), id, role, content).await
    }

    async fn list_messages(&self, id: &str) -> database::Result<Vec<Message>> {
        message::list_messages(self.pool(), id).await
    }

    async fn get_conversation(&self, id: &str) -> database::Result<Conversation> {
        conversation::get_conversation(self.pool(), id).await
    }

    async fn set_status(&self, id: &str, status: Status) -> database::Result<()> {
        conversation::set_status(self.pool(), id, status).await
    }

    async fn list_by_status(&self, statuses: &[Status]) -> database::Result<Vec<Conversation>> {
        conversation::list_by_status(self.pool(), statuses).await
    }
}
