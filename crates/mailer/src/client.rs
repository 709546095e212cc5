use async_trait::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, instrument};

use crate::{Email, MailerConfig, MailerError};

/// Anything that can deliver an [`Email`].
///
/// The SMTP client implements this; tests substitute recorders.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver an email.
    async fn send(&self, email: &Email) -> Result<(), MailerError>;
}

/// Client for sending emails over an SMTP relay with STARTTLS.
///
/// Uses connection pooling; no connection is opened until the first send.
pub struct MailClient {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl MailClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MailerConfig) -> Result<Self, MailerError> {
        let creds = Credentials::new(config.username.clone(), config.password().to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| MailerError::Transport(e.to_string()))?
            .port(config.smtp_port)
            .credentials(creds)
            .build();

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            username = %config.username,
            "Created SMTP client"
        );

        Ok(Self {
            transport,
            from_address: config.username,
        })
    }

    /// Sender address used in the From header.
    pub fn from_address(&self) -> &str {
        &self.from_address
    }

    /// Build a lettre Message from our Email type.
    fn build_message(&self, email: &Email) -> Result<Message, MailerError> {
        let from: Mailbox = self
            .from_address
            .parse()
            .map_err(|e| MailerError::InvalidAddress(format!("From: {}", e)))?;

        if email.to.is_empty() {
            return Err(MailerError::InvalidAddress("no recipients".to_string()));
        }

        let mut builder = Message::builder().from(from).subject(&email.subject);

        for to in &email.to {
            let addr: Mailbox = to
                .parse()
                .map_err(|e| MailerError::InvalidAddress(format!("To '{}': {}", to, e)))?;
            builder = builder.to(addr);
        }

        builder
            .body(email.body.clone())
            .map_err(|e| MailerError::BuildEmail(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for MailClient {
    #[instrument(skip(self, email), fields(to = ?email.to, subject = %email.subject))]
    async fn send(&self, email: &Email) -> Result<(), MailerError> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| MailerError::Send(e.to_string()))?;

        info!(to = ?email.to, subject = %email.subject, "Email sent successfully");
        Ok(())
    }
}
