//! # mailer
//!
//! SMTP client used to notify the support team when a chat is escalated.
//!
//! ## Sending Email
//!
//! ```no_run
//! use mailer::{Email, EmailSender, MailClient, MailerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailer::MailerError> {
//!     let config = MailerConfig::from_env()?;
//!     let client = MailClient::new(config)?;
//!
//!     let email = Email::new("cs@skypay.ph", "CHAT ESCALATION", "A customer needs help");
//!     client.send(&email).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::{EmailSender, MailClient};
pub use config::MailerConfig;
pub use error::MailerError;
pub use types::Email;
