//! End-to-end conversation scenarios over an in-memory store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use database::{Database, Role, Status};
use mock_brain::ScriptedBrain;
use orchestrator::prompt::OFF_TOPIC_REPLY;
use orchestrator::{
    ConversationStore, EscalationEvent, EscalationHook, Orchestrator, OrchestratorError,
    ReplyKind, Session, ESCALATION_NOTE,
};

/// Keeps every escalation it is handed and reports delivery.
#[derive(Clone, Default)]
struct Inbox {
    events: Arc<Mutex<Vec<EscalationEvent>>>,
}

impl Inbox {
    fn calls(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    fn events(&self) -> Vec<EscalationEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EscalationHook for Inbox {
    async fn on_escalated(&self, event: &EscalationEvent) -> bool {
        self.events.lock().unwrap().push(event.clone());
        true
    }
}

struct Harness {
    db: Arc<Database>,
    brain: ScriptedBrain,
    notifier: Inbox,
    orchestrator: Orchestrator,
}

async fn harness() -> Harness {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    let db = Arc::new(db);

    let brain = ScriptedBrain::reply("SkyPay can help with that.");
    let notifier = Inbox::default();
    let orchestrator = Orchestrator::new(db.clone(), Arc::new(brain.clone()))
        .with_notifier(Arc::new(notifier.clone()));

    Harness {
        db,
        brain,
        notifier,
        orchestrator,
    }
}

async fn onboard_ana(h: &Harness) -> Session {
    let (session, _) = h.orchestrator.start_session().await.unwrap();
    let conversation = h
        .orchestrator
        .complete_onboarding(&session, "Ana", "ana@x.com", "Inquiries")
        .await
        .unwrap();
    assert_eq!(conversation.status, Status::Bot);
    session
}

#[tokio::test]
async fn scenario_a_preset_answer_skips_generation() {
    let h = harness().await;
    let session = onboard_ana(&h).await;

    let outcome = h
        .orchestrator
        .handle_user_message(&session, "What is SkyPay?")
        .await
        .unwrap();

    assert_eq!(outcome.kind, ReplyKind::Preset);
    assert_eq!(
        outcome.reply.unwrap().content,
        "SkyPay is a Philippines-based fintech company specializing in payment gateway services. We connect merchants, financial institutions, and billers."
    );
    assert_eq!(h.brain.calls(), 0);
}

#[tokio::test]
async fn scenario_b_off_topic_refused_without_generation() {
    let h = harness().await;
    let session = onboard_ana(&h).await;

    let outcome = h
        .orchestrator
        .handle_user_message(&session, "What is the capital of France?")
        .await
        .unwrap();

    assert_eq!(outcome.kind, ReplyKind::OffTopic);
    let reply = outcome.reply.unwrap();
    assert_eq!(reply.role, Role::Ai);
    assert_eq!(reply.content, OFF_TOPIC_REPLY);
    assert_eq!(h.brain.calls(), 0);
}

#[tokio::test]
async fn scenario_c_refusal_offer_then_escalation() {
    let h = harness().await;
    let session = onboard_ana(&h).await;

    h.orchestrator
        .handle_user_message(&session, "Tell me a joke")
        .await
        .unwrap();

    let view = h.orchestrator.view(&session).await.unwrap();
    assert!(view.offer_escalation);
    assert!(view.escalation_prompt.is_some());

    let receipt = h.orchestrator.request_escalation(&session).await.unwrap();
    assert_eq!(receipt.status, Status::Escalated);
    assert!(receipt.notified);
    assert_eq!(h.notifier.calls(), 1);

    let event = &h.notifier.events()[0];
    assert_eq!(event.ticket_id, receipt.ticket_id);
    assert_eq!(event.user_name, "Ana");
    assert_eq!(event.concern, "Inquiries");

    let messages = h.db.list_messages(session.conversation_id()).await.unwrap();
    let last = messages.last().unwrap();
    assert_eq!(last.role, Role::System);
    assert_eq!(last.content, ESCALATION_NOTE);

    let view = h.orchestrator.view(&session).await.unwrap();
    assert_eq!(view.status, Status::Escalated);
    assert!(view.human_handling);
    assert!(!view.offer_escalation);
}

#[tokio::test]
async fn scenario_d_agent_close_is_terminal() {
    let h = harness().await;
    let session = onboard_ana(&h).await;

    h.orchestrator
        .handle_user_message(&session, "Tell me a joke")
        .await
        .unwrap();
    h.orchestrator.request_escalation(&session).await.unwrap();

    let summary = h
        .orchestrator
        .close_ticket(session.conversation_id())
        .await
        .unwrap();
    assert_eq!(summary.status, Status::Closed);

    let messages = h.db.list_messages(session.conversation_id()).await.unwrap();
    let last = messages.last().unwrap();
    assert_eq!(last.role, Role::System);
    assert_eq!(last.content, "Agent closed this ticket.");

    let count = messages.len();
    let result = h
        .orchestrator
        .handle_user_message(&session, "Hello? Anyone there?")
        .await;
    assert!(matches!(result, Err(OrchestratorError::ConversationClosed)));
    assert_eq!(
        h.db.list_messages(session.conversation_id()).await.unwrap().len(),
        count
    );

    let view = h.orchestrator.view(&session).await.unwrap();
    assert!(!view.accepts_input);
}
