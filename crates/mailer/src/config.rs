use secrecy::{ExposeSecret, SecretString};
use std::env;

use crate::MailerError;

/// Default SMTP relay.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP submission port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for the SMTP relay.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP host (default: smtp.gmail.com)
    pub smtp_host: String,
    /// SMTP port (default: 587)
    pub smtp_port: u16,
    /// Account used to authenticate; also the sender address
    pub username: String,
    /// Account password (app password for Gmail)
    password: SecretString,
}

impl MailerConfig {
    /// Create a new configuration with explicit values.
    pub fn new(
        smtp_host: impl Into<String>,
        smtp_port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            smtp_host: smtp_host.into(),
            smtp_port,
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `SMTP_USERNAME` - Sender account
    /// - `SMTP_PASSWORD` - Account password
    ///
    /// Optional (with defaults):
    /// - `SMTP_HOST` - Default: smtp.gmail.com
    /// - `SMTP_PORT` - Default: 587
    pub fn from_env() -> Result<Self, MailerError> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| DEFAULT_SMTP_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| MailerError::Config(format!("Invalid SMTP_PORT: {}", e)))?;

        let username = env::var("SMTP_USERNAME")
            .map_err(|_| MailerError::MissingEnvVar("SMTP_USERNAME".to_string()))?;

        let password = env::var("SMTP_PASSWORD")
            .map_err(|_| MailerError::MissingEnvVar("SMTP_PASSWORD".to_string()))?;

        Ok(Self {
            smtp_host,
            smtp_port,
            username,
            password: SecretString::from(password),
        })
    }

    /// Get the password (exposes the secret).
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Builder method to set SMTP host.
    pub fn with_smtp_host(mut self, host: impl Into<String>) -> Self {
        self.smtp_host = host.into();
        self
    }

    /// Builder method to set SMTP port.
    pub fn with_smtp_port(mut self, port: u16) -> Self {
        self.smtp_port = port;
        self
    }
}
