//! Per-message routing decision.
//!
//! Planning is pure: it reads the current status, the stored log and the
//! in-memory tables, and never touches the store or the brain.

use brain_core::HistoryMessage;
use database::{Message, Role, Status};
use serde::Serialize;

use crate::error::OrchestratorError;
use crate::guardrail;
use crate::knowledge::KnowledgeBase;
use crate::presets::PresetTable;

/// Default number of stored messages below which the guardrail applies.
pub const DEFAULT_GRACE_TURNS: usize = 3;

/// What to do with one inbound user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnPlan {
    /// Answer with a canned reply.
    Preset {
        answer: String,
    },

    /// Answer with the fixed off-topic refusal.
    OffTopic,

    /// Ask the brain, grounding it in `context` (possibly empty).
    Generate {
        context: String,
    },

    /// A person handles the chat; store the message and reply with nothing.
    Relay,
}

impl TurnPlan {
    /// Whether carrying out this plan calls the brain.
    pub fn needs_generation(&self) -> bool {
        matches!(self, TurnPlan::Generate { .. })
    }
}

/// Tables and thresholds the planner consults.
#[derive(Debug, Clone)]
pub struct TurnRules {
    pub presets: PresetTable,
    pub knowledge: KnowledgeBase,
    pub grace_turns: usize,
}

impl Default for TurnRules {
    fn default() -> Self {
        Self {
            presets: PresetTable::default(),
            knowledge: KnowledgeBase::default(),
            grace_turns: DEFAULT_GRACE_TURNS,
        }
    }
}

impl TurnRules {
    /// Decide how to handle `text` given the status and the log stored
    /// before it.
    pub fn plan(
        &self,
        status: Status,
        prior: &[Message],
        text: &str,
    ) -> Result<TurnPlan, OrchestratorError> {
        match status {
            Status::Closed => return Err(OrchestratorError::ConversationClosed),
            Status::Onboarding => return Err(OrchestratorError::AwaitingOnboarding),
            Status::Escalated | Status::HumanActive => return Ok(TurnPlan::Relay),
            Status::Bot => {}
        }

        if let Some(answer) = self.presets.lookup(text) {
            return Ok(TurnPlan::Preset {
                answer: answer.to_string(),
            });
        }

        let context = self.knowledge.query(text);
        if guardrail::is_off_topic(text, &context, prior.len(), self.grace_turns) {
            return Ok(TurnPlan::OffTopic);
        }

        Ok(TurnPlan::Generate { context })
    }
}

/// Brain history for a stored log. System annotations are dropped; agent
/// replies are presented as assistant turns.
pub fn history_for_generation(prior: &[Message]) -> Vec<HistoryMessage> {
    prior
        .iter()
        .filter_map(|message| match message.role {
            Role::User => Some(HistoryMessage::user(&message.content)),
            Role::Ai | Role::Human => Some(HistoryMessage::assistant(&message.content)),
            Role::System => None,
        })
        .collect()
}
