//! Post-escalation notification hooks.

#[cfg(any(test, feature = "test-util"))]
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use database::Conversation;
use mailer::{Email, EmailSender};
use serde::Serialize;
use tracing::{info, warn};

/// Facts about a committed escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EscalationEvent {
    pub ticket_id: String,
    pub user_name: String,
    pub user_email: String,
    pub concern: String,
    /// Time of escalation, UTC+8.
    pub escalated_at: DateTime<FixedOffset>,
}

impl EscalationEvent {
    /// Build an event from a conversation's stored fields.
    pub fn from_conversation(conversation: &Conversation, escalated_at: DateTime<FixedOffset>) -> Self {
        Self {
            ticket_id: conversation.ticket_id.clone(),
            user_name: conversation.user_name.clone().unwrap_or_default(),
            user_email: conversation.user_email.clone().unwrap_or_default(),
            concern: conversation.concern.clone().unwrap_or_default(),
            escalated_at,
        }
    }

    /// Notification subject line.
    pub fn subject(&self) -> String {
        format!("CHAT ESCALATION: {} - {}", self.ticket_id, self.user_name)
    }

    /// Plain-text notification body.
    pub fn body(&self) -> String {
        format!(
            "NEW CHAT ESCALATION\n\n\
             Ticket ID: {}\n\
             Customer Name: {}\n\
             Customer Email: {}\n\
             Concern: {}\n\
             Timestamp: {}\n",
            self.ticket_id,
            self.user_name,
            self.user_email,
            self.concern,
            self.escalated_at.format("%Y-%m-%d %I:%M %p"),
        )
    }
}

/// Runs after the `escalated` status is committed.
///
/// Returns whether the notice actually reached support. Hooks that deliver
/// nothing return `false`. Implementations absorb their own failures; the
/// result is informational only.
#[async_trait]
pub trait EscalationHook: Send + Sync {
    async fn on_escalated(&self, event: &EscalationEvent) -> bool;
}

/// Emails the operations inbox.
pub struct MailNotifier {
    sender: Arc<dyn EmailSender>,
    recipient: String,
}

impl MailNotifier {
    /// Create a notifier that sends through `sender` to `recipient`.
    pub fn new(sender: Arc<dyn EmailSender>, recipient: impl Into<String>) -> Self {
        Self {
            sender,
            recipient: recipient.into(),
        }
    }

    /// The operations address.
    pub fn recipient(&self) -> &str {
        &self.recipient
    }
}

#[async_trait]
impl EscalationHook for MailNotifier {
    async fn on_escalated(&self, event: &EscalationEvent) -> bool {
        let email = Email::new(&self.recipient, event.subject(), event.body());
        match self.sender.send(&email).await {
            Ok(()) => {
                info!(ticket_id = %event.ticket_id, "Escalation email sent");
                true
            }
            Err(e) => {
                warn!(ticket_id = %event.ticket_id, "Failed to send escalation email: {}", e);
                false
            }
        }
    }
}

/// Logs escalations instead of delivering them.
///
/// Used when no mail transport is configured. Nothing reaches support, so
/// every escalation reports `false`.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl EscalationHook for LoggingNotifier {
    async fn on_escalated(&self, event: &EscalationEvent) -> bool {
        info!(
            ticket_id = %event.ticket_id,
            user = %event.user_name,
            email = %event.user_email,
            concern = %event.concern,
            "Escalation (not delivered): {}",
            event.subject()
        );
        false
    }
}

/// Discards escalations and reports them undelivered.
#[derive(Debug, Clone, Default)]
pub struct NoOpNotifier;

#[async_trait]
impl EscalationHook for NoOpNotifier {
    async fn on_escalated(&self, _event: &EscalationEvent) -> bool {
        false
    }
}

/// Counts invocations and returns a fixed result.
///
/// Clones share the counter and the recorded events. Available to other
/// crates' tests through the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    succeed: bool,
    calls: Arc<AtomicUsize>,
    events: Arc<std::sync::Mutex<Vec<EscalationEvent>>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingNotifier {
    /// A recorder that reports successful delivery.
    pub fn succeeding() -> Self {
        Self::with_result(true)
    }

    /// A recorder that reports failed delivery.
    pub fn failing() -> Self {
        Self::with_result(false)
    }

    fn with_result(succeed: bool) -> Self {
        Self {
            succeed,
            calls: Arc::new(AtomicUsize::new(0)),
            events: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Number of invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Events received so far.
    pub fn events(&self) -> Vec<EscalationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl EscalationHook for RecordingNotifier {
    async fn on_escalated(&self, event: &EscalationEvent) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
        self.succeed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use database::clock::SUPPORT_OFFSET;
    use mailer::MailerError;
    use std::sync::Mutex;

    fn event() -> EscalationEvent {
        EscalationEvent {
            ticket_id: "SKY-20250105-0007".to_string(),
            user_name: "Ana".to_string(),
            user_email: "ana@x.com".to_string(),
            concern: "Inquiries".to_string(),
            escalated_at: SUPPORT_OFFSET.with_ymd_and_hms(2025, 1, 5, 14, 5, 0).unwrap(),
        }
    }

    #[derive(Default)]
    struct CapturingSender {
        sent: Mutex<Vec<Email>>,
        fail: bool,
    }

    #[async_trait]
    impl EmailSender for CapturingSender {
        async fn send(&self, email: &Email) -> Result<(), MailerError> {
            if self.fail {
                return Err(MailerError::Send("connection reset".to_string()));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    #[test]
    fn test_subject_and_body() {
        let event = event();
        assert_eq!(event.subject(), "CHAT ESCALATION: SKY-20250105-0007 - Ana");

        let body = event.body();
        assert!(body.contains("Ticket ID: SKY-20250105-0007\n"));
        assert!(body.contains("Customer Name: Ana\n"));
        assert!(body.contains("Customer Email: ana@x.com\n"));
        assert!(body.contains("Concern: Inquiries\n"));
        assert!(body.contains("Timestamp: 2025-01-05 02:05 PM\n"));
    }

    #[tokio::test]
    async fn test_mail_notifier_sends_to_recipient() {
        let sender = Arc::new(CapturingSender::default());
        let notifier = MailNotifier::new(sender.clone(), "ops@skypay.ph");

        assert!(notifier.on_escalated(&event()).await);

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, vec!["ops@skypay.ph"]);
        assert_eq!(sent[0].subject, "CHAT ESCALATION: SKY-20250105-0007 - Ana");
    }

    #[tokio::test]
    async fn test_mail_notifier_absorbs_failure() {
        let sender = Arc::new(CapturingSender {
            fail: true,
            ..Default::default()
        });
        let notifier = MailNotifier::new(sender, "ops@skypay.ph");

        assert!(!notifier.on_escalated(&event()).await);
    }

    #[tokio::test]
    async fn test_undelivered_notifiers_report_failure() {
        assert!(!LoggingNotifier.on_escalated(&event()).await);
        assert!(!NoOpNotifier.on_escalated(&event()).await);
    }

    #[tokio::test]
    async fn test_recording_notifier_shares_state() {

        let recorder = RecordingNotifier::failing();
        let handle = recorder.clone();
        assert!(!recorder.on_escalated(&event()).await);
        assert_eq!(handle.calls(), 1);
        assert_eq!(handle.events()[0].ticket_id, "SKY-20250105-0007");
    }
}
