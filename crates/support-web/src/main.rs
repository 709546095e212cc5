//! Support web server for the SkyPay chat bridge.
//!
//! Serves the end-user chat and the agent desk as JSON APIs.

mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use groq_brain::GroqBrain;
use mailer::{MailClient, MailerConfig};
use orchestrator::{EscalationHook, LoggingNotifier, MailNotifier, Orchestrator, SupportConfig};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let support = SupportConfig::from_env()?;
    info!(addr = %config.addr, "Starting support web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let brain = GroqBrain::from_env()?;
    info!(model = %brain.config().model, "Generation backend ready");

    let orchestrator = Orchestrator::new(Arc::new(db), Arc::new(brain))
        .with_rules(support.load_rules())
        .with_notifier(escalation_notifier(&config));

    // Build router
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(orchestrator));

    // Start server
    info!(addr = %config.addr, "Support web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Email the operations inbox when SMTP is configured. Otherwise escalations
/// are only logged and their receipts report `notified: false`.
fn escalation_notifier(config: &Config) -> Arc<dyn EscalationHook> {
    let Some(recipient) = config.escalation_email_to.clone() else {
        warn!("ESCALATION_EMAIL_TO not set, escalations will only be logged");
        return Arc::new(LoggingNotifier);
    };

    match MailerConfig::from_env().and_then(MailClient::new) {
        Ok(client) => {
            info!(to = %recipient, "Escalation emails enabled");
            Arc::new(MailNotifier::new(Arc::new(client), recipient))
        }
        Err(e) => {
            warn!("SMTP unavailable, escalations will only be logged: {}", e);
            Arc::new(LoggingNotifier)
        }
    }
}
