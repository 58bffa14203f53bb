//! Coach runtime settings

use std::env;

use arena_llm::ConfigError;

use crate::report::ScoringStrategy;
use crate::session::DEFAULT_CONTEXT_WINDOW;

/// Coach configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CoachConfig {
    /// Turns included in generation prompts (env: ARENA_CONTEXT_WINDOW)
    pub context_window: usize,
    /// Per-session turn cap, unbounded when `None` (env: ARENA_MAX_HISTORY)
    pub max_history_turns: Option<usize>,
    /// Final score policy (env: ARENA_SCORING)
    pub scoring: ScoringStrategy,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
            max_history_turns: None,
            scoring: ScoringStrategy::Computed,
        }
    }
}

impl CoachConfig {
    /// Load from environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let context_window = match lookup("ARENA_CONTEXT_WINDOW") {
            Some(raw) => parse_count("ARENA_CONTEXT_WINDOW", &raw)?,
            None => defaults.context_window,
        };
        let max_history_turns = lookup("ARENA_MAX_HISTORY")
            .map(|raw| parse_count("ARENA_MAX_HISTORY", &raw))
            .transpose()?;
        let scoring = match lookup("ARENA_SCORING") {
            Some(raw) => raw.parse()?,
            None => defaults.scoring,
        };

        Ok(Self {
            context_window,
            max_history_turns,
            scoring,
        })
    }
}

fn parse_count(name: &str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}
