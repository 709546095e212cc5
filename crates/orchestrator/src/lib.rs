//! Conversation state machine and escalation workflow for SkyPay support.
//!
//! This crate provides the [`Orchestrator`] type which moves a support
//! conversation from onboarding through automated answers to a human agent.
//!
//! # Features
//!
//! - Exact-match FAQ answers without calling the brain
//! - Fuzzy retrieval of knowledge lines as grounding context
//! - Off-topic guardrail for the first turns of a chat
//! - Refusal detection and an explicit escalation offer
//! - Best-effort email notification after escalation
//! - Agent queue projections with in-memory search
//!
//! # Architecture
//!
//! ```text
//! User message (from support-web)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Read status and history from the store                  │
//! │         ↓                                                   │
//! │  2. Plan the turn (pure):                                   │
//! │     • closed / onboarding → reject                          │
//! │     • escalated / human_active → relay to agent             │
//! │     • preset question → canned answer                       │
//! │     • off-topic early in chat → fixed refusal               │
//! │     • otherwise → brain with retrieved context              │
//! │         ↓                                                   │
//! │  3. Append user message, then the reply                     │
//! │         ↓                                                   │
//! │  4. Detector flags refusals → escalation offer              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use orchestrator::{Orchestrator, SupportConfig};
//!
//! let orchestrator = Orchestrator::new(Arc::new(db), Arc::new(brain))
//!     .with_rules(SupportConfig::from_env()?.load_rules());
//!
//! let (session, _) = orchestrator.start_session().await?;
//! orchestrator.complete_onboarding(&session, "Ana", "ana@x.com", "Inquiries").await?;
//! let outcome = orchestrator.handle_user_message(&session, "What is SkyPay?").await?;
//! ```

mod config;
mod error;
pub mod escalation;
pub mod guardrail;
pub mod knowledge;
pub mod notifier;
mod orchestrator;
pub mod plan;
pub mod presets;
pub mod prompt;
pub mod queue;
mod session;
mod store;

pub use config::SupportConfig;
pub use error::OrchestratorError;
pub use escalation::{EscalationDetector, MarkerClassifier, RefusalClassifier};
pub use knowledge::KnowledgeBase;
pub use notifier::{EscalationEvent, EscalationHook, LoggingNotifier, MailNotifier, NoOpNotifier};
#[cfg(any(test, feature = "test-util"))]
pub use notifier::RecordingNotifier;
pub use orchestrator::{onboarding_note, Orchestrator, CLOSURE_NOTE, ESCALATION_NOTE};
pub use plan::{TurnPlan, TurnRules};
pub use presets::PresetTable;
pub use queue::{QueueView, TicketDetail, TicketSummary};
pub use session::{
    ConversationView, EscalationReceipt, ReplyKind, Session, ThreadMessage, TurnOutcome,
    ESCALATION_OFFER_TEXT, HUMAN_HANDOFF_NOTICE,
};
pub use store::ConversationStore;
