//! Conversation state machine driving the support chat.

use std::sync::Arc;

use brain_core::{Brain, GenerationRequest};
use database::validation::{validate_email, validate_name};
use database::{clock, Concern, Conversation, DatabaseError, Message, Role, Status, ValidationError};
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;
use crate::escalation::EscalationDetector;
use crate::notifier::{EscalationEvent, EscalationHook, NoOpNotifier};
use crate::plan::{history_for_generation, TurnPlan, TurnRules};
use crate::prompt::{build_system_prompt, OFF_TOPIC_REPLY};
use crate::queue::{filter_tickets, QueueView, TicketDetail, TicketSummary};
use crate::session::{ConversationView, EscalationReceipt, ReplyKind, Session, ThreadMessage, TurnOutcome};
use crate::store::ConversationStore;

/// System note appended when the user confirms escalation.
pub const ESCALATION_NOTE: &str = "User requested human agent. Support notified.";

/// System note appended when an agent resolves a ticket.
pub const CLOSURE_NOTE: &str = "Agent closed this ticket.";

/// System note recording onboarding details.
pub fn onboarding_note(name: &str, email: &str) -> String {
    format!("User: {}, Email: {}", name, email)
}

/// Drives conversations through `onboarding → bot → escalated → human_active → closed`.
///
/// The orchestrator holds no per-conversation state: every operation
/// re-reads status and history from the store, decides, then appends.
///
/// - Preset questions are answered without calling the brain
/// - Unrelated questions early in a chat get a fixed refusal
/// - Everything else is answered by the brain with retrieved context
/// - Refusals surface an escalation offer; confirming it notifies support
pub struct Orchestrator {
    store: Arc<dyn ConversationStore>,
    brain: Arc<dyn Brain>,
    notifier: Arc<dyn EscalationHook>,
    rules: TurnRules,
    detector: EscalationDetector,
}

impl Orchestrator {
    /// Create an orchestrator with default rules and no notifications.
    pub fn new(store: Arc<dyn ConversationStore>, brain: Arc<dyn Brain>) -> Self {
        Self {
            store,
            brain,
            notifier: Arc::new(NoOpNotifier),
            rules: TurnRules::default(),
            detector: EscalationDetector::default(),
        }
    }

    /// Set the escalation hook.
    pub fn with_notifier(mut self, notifier: Arc<dyn EscalationHook>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Set presets, knowledge and guardrail window.
    pub fn with_rules(mut self, rules: TurnRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the escalation detector.
    pub fn with_detector(mut self, detector: EscalationDetector) -> Self {
        self.detector = detector;
        self
    }

    /// FAQ questions, in display order.
    pub fn preset_questions(&self) -> Vec<String> {
        self.rules.presets.questions().map(str::to_string).collect()
    }

    /// Start a new conversation in `onboarding`.
    pub async fn start_session(&self) -> Result<(Session, Conversation), OrchestratorError> {
        let conversation = self.store.create_conversation().await?;
        info!(
            conversation_id = %conversation.id,
            ticket_id = %conversation.ticket_id,
            "Session started"
        );
        Ok((Session::resume(conversation.id.clone()), conversation))
    }

    /// Record name, email and concern, then move to `bot`.
    ///
    /// Input is validated before anything is written; rejected input leaves
    /// the conversation untouched.
    pub async fn complete_onboarding(
        &self,
        session: &Session,
        name: &str,
        email: &str,
        concern: &str,
    ) -> Result<Conversation, OrchestratorError> {
        let id = session.conversation_id();
        let conversation = self.store.get_conversation(id).await?;
        match conversation.status {
            Status::Onboarding => {}
            Status::Closed => return Err(OrchestratorError::ConversationClosed),
            from => {
                return Err(OrchestratorError::InvalidTransition {
                    from,
                    to: Status::Bot,
                })
            }
        }

        validate_name(name)?;
        validate_email(email)?;
        let concern: Concern = concern.parse()?;
        let name = name.trim();
        let email = email.trim();

        match self
            .store
            .complete_onboarding(id, name, concern.as_str(), email)
            .await
        {
            Ok(()) => {}
            Err(DatabaseError::AlreadyExists { .. }) => {
                let current = self.store.get_conversation(id).await?;
                return Err(OrchestratorError::InvalidTransition {
                    from: current.status,
                    to: Status::Bot,
                });
            }
            Err(e) => return Err(e.into()),
        }

        self.store
            .append_message(id, Role::System, &onboarding_note(name, email))
            .await?;

        info!(
            conversation_id = %id,
            ticket_id = %conversation.ticket_id,
            concern = %concern,
            "Onboarding complete"
        );

        Ok(self.store.get_conversation(id).await?)
    }

    /// Handle one user message.
    ///
    /// The user message is stored before any reply is produced. When the
    /// brain fails, its error is returned and no reply is stored.
    pub async fn handle_user_message(
        &self,
        session: &Session,
        text: &str,
    ) -> Result<TurnOutcome, OrchestratorError> {
        if text.trim().is_empty() {
            return Err(ValidationError::Empty("message".to_string()).into());
        }

        let id = session.conversation_id();
        let conversation = self.store.get_conversation(id).await?;
        let prior = self.store.list_messages(id).await?;
        let plan = self.rules.plan(conversation.status, &prior, text)?;
        debug!(conversation_id = %id, ?plan, "Planned turn");

        let message = self.store.append_message(id, Role::User, text).await?;

        let (reply_text, kind) = match plan {
            TurnPlan::Relay => {
                debug!(conversation_id = %id, "Relaying message to agent");
                return Ok(TurnOutcome {
                    message,
                    reply: None,
                    kind: ReplyKind::Relayed,
                    offer_escalation: false,
                    status: conversation.status,
                });
            }
            TurnPlan::Preset { answer } => (answer, ReplyKind::Preset),
            TurnPlan::OffTopic => {
                info!(conversation_id = %id, "Refusing off-topic message");
                (OFF_TOPIC_REPLY.to_string(), ReplyKind::OffTopic)
            }
            TurnPlan::Generate { context } => {
                let request = GenerationRequest::new(build_system_prompt(&context), text)
                    .with_history(history_for_generation(&prior));
                let reply = self.brain.generate(request).await.map_err(|e| {
                    warn!(conversation_id = %id, brain = self.brain.name(), "Generation failed: {}", e);
                    e
                })?;
                info!(conversation_id = %id, "Generated reply: {} chars", reply.len());
                (reply, ReplyKind::Generated)
            }
        };

        let reply = self.store.append_message(id, Role::Ai, &reply_text).await?;
        let offer_escalation = self.detector.is_refusal(&reply.content);

        Ok(TurnOutcome {
            message,
            reply: Some(reply),
            kind,
            offer_escalation,
            status: conversation.status,
        })
    }

    /// What the chat screen shows for a session.
    pub async fn view(&self, session: &Session) -> Result<ConversationView, OrchestratorError> {
        let id = session.conversation_id();
        let conversation = self.store.get_conversation(id).await?;
        let messages = self.store.list_messages(id).await?;
        let offer = self.detector.should_offer(&messages);
        Ok(ConversationView::build(conversation, messages, offer))
    }

    /// Confirm the escalation offer: move to `escalated` and notify support.
    ///
    /// The system note is appended before the status changes, so a failed
    /// append leaves the conversation in `bot` with support not notified.
    /// The notifier runs after the transition is stored; its result is
    /// reported but cannot undo the transition.
    pub async fn request_escalation(
        &self,
        session: &Session,
    ) -> Result<EscalationReceipt, OrchestratorError> {
        let id = session.conversation_id();
        let conversation = self.store.get_conversation(id).await?;
        match conversation.status {
            Status::Bot => {}
            Status::Closed => return Err(OrchestratorError::ConversationClosed),
            Status::Onboarding => return Err(OrchestratorError::AwaitingOnboarding),
            from => {
                return Err(OrchestratorError::InvalidTransition {
                    from,
                    to: Status::Escalated,
                })
            }
        }

        let messages = self.store.list_messages(id).await?;
        if !self.detector.should_offer(&messages) {
            return Err(OrchestratorError::EscalationNotOffered);
        }

        self.store
            .append_message(id, Role::System, ESCALATION_NOTE)
            .await?;
        self.store.set_status(id, Status::Escalated).await?;
        info!(
            conversation_id = %id,
            ticket_id = %conversation.ticket_id,
            "Conversation escalated"
        );

        let event = EscalationEvent::from_conversation(&conversation, clock::now());
        let notified = self.notifier.on_escalated(&event).await;
        if !notified {
            warn!(ticket_id = %conversation.ticket_id, "Escalation committed without notification");
        }

        Ok(EscalationReceipt {
            ticket_id: conversation.ticket_id,
            status: Status::Escalated,
            notified,
        })
    }

    /// Tickets in a queue view, newest first, filtered by `query`.
    pub async fn list_tickets(
        &self,
        view: QueueView,
        query: Option<&str>,
    ) -> Result<Vec<TicketSummary>, OrchestratorError> {
        let conversations = self.store.list_by_status(view.statuses()).await?;
        Ok(filter_tickets(conversations, query))
    }

    /// Open a ticket on the agent desk.
    ///
    /// The first open of an `escalated` ticket marks it `human_active`.
    /// Any other status is left as is.
    pub async fn open_ticket(&self, conversation_id: &str) -> Result<TicketDetail, OrchestratorError> {
        let mut conversation = self.store.get_conversation(conversation_id).await?;
        if conversation.status == Status::Escalated {
            self.store
                .set_status(conversation_id, Status::HumanActive)
                .await?;
            conversation.status = Status::HumanActive;
            info!(
                conversation_id = %conversation_id,
                ticket_id = %conversation.ticket_id,
                "Agent took over ticket"
            );
        }

        let messages = self.store.list_messages(conversation_id).await?;
        Ok(TicketDetail {
            summary: TicketSummary::from(conversation),
            thread: ThreadMessage::visible(messages),
        })
    }

    /// Post an agent reply.
    ///
    /// Allowed while a person handles the ticket; replying to an
    /// `escalated` ticket also marks it `human_active`.
    pub async fn agent_reply(
        &self,
        conversation_id: &str,
        text: &str,
    ) -> Result<Message, OrchestratorError> {
        if text.trim().is_empty() {
            return Err(ValidationError::Empty("message".to_string()).into());
        }

        let conversation = self.store.get_conversation(conversation_id).await?;
        match conversation.status {
            Status::HumanActive => {}
            Status::Escalated => {
                self.store
                    .set_status(conversation_id, Status::HumanActive)
                    .await?;
                info!(conversation_id = %conversation_id, "Agent took over ticket");
            }
            Status::Closed => return Err(OrchestratorError::ConversationClosed),
            from => {
                return Err(OrchestratorError::InvalidTransition {
                    from,
                    to: Status::HumanActive,
                })
            }
        }

        Ok(self
            .store
            .append_message(conversation_id, Role::Human, text)
            .await?)
    }

    /// Resolve a ticket. Closed is terminal.
    pub async fn close_ticket(&self, conversation_id: &str) -> Result<TicketSummary, OrchestratorError> {
        let mut conversation = self.store.get_conversation(conversation_id).await?;
        if conversation.status == Status::Closed {
            return Err(OrchestratorError::ConversationClosed);
        }

        self.store.set_status(conversation_id, Status::Closed).await?;
        self.store
            .append_message(conversation_id, Role::System, CLOSURE_NOTE)
            .await?;
        info!(
            conversation_id = %conversation_id,
            ticket_id = %conversation.ticket_id,
            from = %conversation.status,
            "Ticket closed"
        );

        conversation.status = Status::Closed;
        Ok(TicketSummary::from(conversation))
    }
}
