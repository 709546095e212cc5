//! Configuration for the support state machine.

use std::env;
use std::path::PathBuf;

use crate::error::OrchestratorError;
use crate::knowledge::{KnowledgeBase, DEFAULT_LIMIT, DEFAULT_THRESHOLD};
use crate::plan::{TurnRules, DEFAULT_GRACE_TURNS};
use crate::presets::PresetTable;

/// Default knowledge file, relative to the working directory.
pub const DEFAULT_KNOWLEDGE_PATH: &str = "knowledge.txt";

/// Tunables for routing user messages.
#[derive(Debug, Clone, PartialEq)]
pub struct SupportConfig {
    /// Knowledge file, one snippet per line.
    pub knowledge_path: PathBuf,
    /// Stored-message count below which the off-topic guardrail applies.
    pub grace_turns: usize,
    /// Score a knowledge line must exceed (0-100).
    pub context_threshold: u32,
    /// Maximum knowledge lines passed as context.
    pub context_limit: usize,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            knowledge_path: PathBuf::from(DEFAULT_KNOWLEDGE_PATH),
            grace_turns: DEFAULT_GRACE_TURNS,
            context_threshold: DEFAULT_THRESHOLD,
            context_limit: DEFAULT_LIMIT,
        }
    }
}

impl SupportConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `SUPPORT_KNOWLEDGE_PATH` - Knowledge file (default: knowledge.txt)
    /// - `SUPPORT_GRACE_TURNS` - Guardrail grace window (default: 3)
    /// - `SUPPORT_CONTEXT_THRESHOLD` - Retrieval score threshold (default: 60)
    /// - `SUPPORT_CONTEXT_LIMIT` - Retrieved lines (default: 3)
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let defaults = Self::default();

        let knowledge_path = env::var("SUPPORT_KNOWLEDGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.knowledge_path);

        Ok(Self {
            knowledge_path,
            grace_turns: parse_var("SUPPORT_GRACE_TURNS", defaults.grace_turns)?,
            context_threshold: parse_var("SUPPORT_CONTEXT_THRESHOLD", defaults.context_threshold)?,
            context_limit: parse_var("SUPPORT_CONTEXT_LIMIT", defaults.context_limit)?,
        })
    }

    /// Load the knowledge file and assemble routing rules.
    pub fn load_rules(&self) -> TurnRules {
        let knowledge = KnowledgeBase::load(&self.knowledge_path)
            .with_threshold(self.context_threshold)
            .with_limit(self.context_limit);

        TurnRules {
            presets: PresetTable::default(),
            knowledge,
            grace_turns: self.grace_turns,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, OrchestratorError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| OrchestratorError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SupportConfig::default();
        assert_eq!(config.knowledge_path, PathBuf::from("knowledge.txt"));
        assert_eq!(config.grace_turns, 3);
        assert_eq!(config.context_threshold, 60);
        assert_eq!(config.context_limit, 3);
    }

    #[test]
    fn test_load_rules_with_missing_file() {
        let config = SupportConfig {
            knowledge_path: PathBuf::from("/definitely/not/here.txt"),
            grace_turns: 5,
            ..SupportConfig::default()
        };
        let rules = config.load_rules();
        assert!(rules.knowledge.is_empty());
        assert_eq!(rules.grace_turns, 5);
        assert!(rules.presets.lookup("What is SkyPay?").is_some());
    }

    // Environment-based tests are combined into a single test to avoid
    // race conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_all_support_vars() {
            std::env::remove_var("SUPPORT_KNOWLEDGE_PATH");
            std::env::remove_var("SUPPORT_GRACE_TURNS");
            std::env::remove_var("SUPPORT_CONTEXT_THRESHOLD");
            std::env::remove_var("SUPPORT_CONTEXT_LIMIT");
        }

        clear_all_support_vars();
        assert_eq!(SupportConfig::from_env().unwrap(), SupportConfig::default());

        std::env::set_var("SUPPORT_KNOWLEDGE_PATH", "/srv/kb.txt");
        std::env::set_var("SUPPORT_GRACE_TURNS", "5");
        std::env::set_var("SUPPORT_CONTEXT_LIMIT", "1");
        let config = SupportConfig::from_env().unwrap();
        assert_eq!(config.knowledge_path, PathBuf::from("/srv/kb.txt"));
        assert_eq!(config.grace_turns, 5);
        assert_eq!(config.context_threshold, 60);
        assert_eq!(config.context_limit, 1);

        std::env::set_var("SUPPORT_CONTEXT_THRESHOLD", "high");
        assert!(matches!(
            SupportConfig::from_env(),
            Err(OrchestratorError::Config(msg)) if msg.contains("SUPPORT_CONTEXT_THRESHOLD")
        ));

        clear_all_support_vars();
    }
}
