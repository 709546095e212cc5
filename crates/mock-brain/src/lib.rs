//! Mock brain implementations for the support state machine.
//!
//! This crate provides mock implementations of the `Brain` trait for testing:
//! - `ScriptedBrain` - Returns canned replies and records every request
//! - `FailingBrain` - Always fails with a chosen error
//! - `DelayedBrain` - Wraps another brain with artificial delay
//!
//! For production replies, use the `groq-brain` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Brain, GenerationRequest, ScriptedBrain};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let brain = ScriptedBrain::reply("SkyPay is a payment gateway.");
//!
//!     let reply = brain.generate(GenerationRequest::new("rules", "What is SkyPay?")).await?;
//!     assert_eq!(reply, "SkyPay is a payment gateway.");
//!     assert_eq!(brain.calls(), 1);
//!     Ok(())
//! }
//! ```

// Mock implementations
mod delayed;
mod failing;
mod scripted;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, GenerationRequest, HistoryMessage};

// Export mock implementations
pub use delayed::DelayedBrain;
pub use failing::{FailingBrain, FailureKind};
pub use scripted::ScriptedBrain;
