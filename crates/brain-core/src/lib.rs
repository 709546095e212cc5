//! Core trait and types for text generation backends.
//!
//! This crate provides the shared interface between the support state
//! machine and whatever produces automated replies. It defines:
//!
//! - [`Brain`] - The trait that all generation backends must implement
//! - [`GenerationRequest`] / [`HistoryMessage`] - Input for a single reply
//! - [`BrainError`] - Error types for generation
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, GenerationRequest};
//! use async_trait::async_trait;
//!
//! struct MyBrain;
//!
//! #[async_trait]
//! impl Brain for MyBrain {
//!     async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
//!         Ok(format!("You said: {}", request.message))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBrain"
//!     }
//! }
//! ```

mod error;
mod prompt;
mod request;
mod trait_def;

pub use error::BrainError;
pub use prompt::{hash_prompt, prompt_fingerprint};
pub use request::{GenerationRequest, HistoryMessage};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
