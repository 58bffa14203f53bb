//! Coaching modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoachError;

/// Inputs that close a scored debate and trigger the final report
pub const TERMINATION_PHRASES: [&str; 3] = ["fin du débat", "fin", "score"];

/// How the coach treats a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Free-form sparring, never scored
    #[default]
    Train,
    /// Every argument is judged; a termination phrase yields the report
    Score,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Train => "train",
            Mode::Score => "score",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "train" => Ok(Mode::Train),
            "score" => Ok(Mode::Score),
            other => Err(CoachError::UnknownMode(other.to_string())),
        }
    }
}

/// Whether `message` ends a scored debate (case-insensitive, surrounding
/// whitespace ignored)
pub fn is_termination_phrase(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    TERMINATION_PHRASES.contains(&normalized.as_str())
}
