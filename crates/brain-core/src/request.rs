//! Generation request types.

use serde::{Deserialize, Serialize};

/// A single message in the history passed to a backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// Role: "user", "assistant" or "system"
    pub role: String,
    /// Message content
    pub content: String,
}

impl HistoryMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Everything a backend needs to produce one reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System instruction, sent first.
    pub system_prompt: String,
    /// Prior turns, oldest first. Excludes the new message.
    pub history: Vec<HistoryMessage>,
    /// The new user message.
    pub message: String,
}

impl GenerationRequest {
    /// Create a request with no prior history.
    pub fn new(system_prompt: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            history: Vec::new(),
            message: message.into(),
        }
    }

    /// Set the prior history.
    pub fn with_history(mut self, history: Vec<HistoryMessage>) -> Self {
        self.history = history;
        self
    }

    /// Full message list in send order: system, history, then the new user message.
    pub fn to_messages(&self) -> Vec<HistoryMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(HistoryMessage::system(&self.system_prompt));
        messages.extend(self.history.iter().cloned());
        messages.push(HistoryMessage::user(&self.message));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_messages_order() {
        let request = GenerationRequest::new("be helpful", "and now?").with_history(vec![
            HistoryMessage::user("hi"),
            HistoryMessage::assistant("hello"),
        ]);

        let messages = request.to_messages();
        let roles: Vec<&str> = messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[0].content, "be helpful");
        assert_eq!(messages[3].content, "and now?");
    }

    #[test]
    fn test_history_message_serializes() {
        let json = serde_json::to_string(&HistoryMessage::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
