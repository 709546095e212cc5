//! Scripted brain implementation - canned replies with call recording.

use std::sync::{Arc, Mutex};

use brain_core::{async_trait, Brain, BrainError, GenerationRequest};

/// A brain that answers from a script and records what it was asked.
///
/// Replies are handed out in order; once the script runs out, the last
/// reply repeats. Clones share the script and the recorded requests, so a
/// test can keep one handle while the code under test owns another.
#[derive(Debug, Clone)]
pub struct ScriptedBrain {
    replies: Arc<Vec<String>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedBrain {
    /// Create a brain that always answers with `reply`.
    pub fn reply(reply: impl Into<String>) -> Self {
        Self::with_replies(vec![reply.into()])
    }

    /// Create a brain that answers with `replies` in order.
    ///
    /// An empty script answers with an empty string.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: Arc::new(replies),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.lock().len()
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.lock().clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<GenerationRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
        let mut requests = self.lock();
        let index = requests.len();
        requests.push(request);

        let reply = self
            .replies
            .get(index)
            .or_else(|| self.replies.last())
            .cloned()
            .unwrap_or_default();

        Ok(reply)
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}
