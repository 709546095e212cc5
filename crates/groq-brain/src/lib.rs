//! Groq-based brain implementation.
//!
//! This crate provides a [`Brain`] that calls an OpenAI-compatible
//! chat-completions endpoint. Groq is the default host; any compatible
//! server works by changing the API URL.
//!
//! # Features
//!
//! - Stateless: the caller supplies the system prompt and history per request
//! - Low temperature defaults suited to factual support answers
//! - Request timeout enforced by the HTTP client
//! - Configurable via environment variables or a builder
//!
//! # Usage
//!
//! ```rust,no_run
//! use groq_brain::{Brain, GenerationRequest, GroqBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = GroqBrain::from_env()?;
//!     let reply = brain
//!         .generate(GenerationRequest::new("You answer SkyPay questions.", "Hi!"))
//!         .await?;
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

mod api_types;
mod brain;
mod config;

pub use brain::GroqBrain;
pub use config::{GroqBrainConfig, GroqBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, GenerationRequest, HistoryMessage};
