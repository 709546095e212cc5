//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Support web server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Operations inbox for escalation emails.
    pub escalation_email_to: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SUPPORT_ADDR` | Server bind address | `127.0.0.1:8501` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:support.db?mode=rwc` |
    /// | `ESCALATION_EMAIL_TO` | Operations inbox | (none: escalations are only logged) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("SUPPORT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8501".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("SQLITE_PATH")
            .unwrap_or_else(|_| "sqlite:support.db?mode=rwc".to_string());

        let escalation_email_to = env::var("ESCALATION_EMAIL_TO")
            .ok()
            .map(|to| to.trim().to_string())
            .filter(|to| !to.is_empty());

        Ok(Self {
            addr,
            database_url,
            escalation_email_to,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SUPPORT_ADDR format")]
    InvalidAddr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        env::remove_var("SUPPORT_ADDR");
        env::remove_var("SQLITE_PATH");
        env::remove_var("ESCALATION_EMAIL_TO");

        let config = Config::from_env().unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8501");
        assert_eq!(config.database_url, "sqlite:support.db?mode=rwc");
        assert!(config.escalation_email_to.is_none());

        env::set_var("ESCALATION_EMAIL_TO", "  ");
        assert!(Config::from_env().unwrap().escalation_email_to.is_none());

        env::set_var("ESCALATION_EMAIL_TO", "ops@skypay.ph");
        assert_eq!(
            Config::from_env().unwrap().escalation_email_to.as_deref(),
            Some("ops@skypay.ph")
        );

        env::set_var("SUPPORT_ADDR", "not-an-addr");
        assert!(matches!(Config::from_env(), Err(ConfigError::InvalidAddr)));

        env::remove_var("SUPPORT_ADDR");
        env::remove_var("ESCALATION_EMAIL_TO");
    }
}
