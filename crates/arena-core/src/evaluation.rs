//! Per-argument evaluations and their validation
//!
//! The evaluation collaborator is asked for a JSON object holding an idea
//! summary and five criterion scores. Its output is untrusted: [`validate`]
//! repairs missing or non-numeric fields and falls back to a fixed record
//! when nothing usable can be parsed. Validation never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Upper bound of a criterion score
pub const MAX_CRITERION_SCORE: f64 = 20.0;

/// Substitute for a missing or non-numeric criterion
pub const DEFAULT_CRITERION_SCORE: f64 = 15.0;

/// Characters of the message kept as idea summary when none is provided
pub const IDEA_FALLBACK_CHARS: usize = 50;

/// Argument-quality dimensions, each scored 0-20
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Criterion {
    #[serde(rename = "logique")]
    Logic,
    #[serde(rename = "preuves")]
    Evidence,
    #[serde(rename = "force_argumentative")]
    Strength,
    #[serde(rename = "structure")]
    Structure,
    #[serde(rename = "clarte_style")]
    Clarity,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Logic,
        Criterion::Evidence,
        Criterion::Strength,
        Criterion::Structure,
        Criterion::Clarity,
    ];

    /// JSON key used by the evaluation collaborator
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::Logic => "logique",
            Criterion::Evidence => "preuves",
            Criterion::Strength => "force_argumentative",
            Criterion::Structure => "structure",
            Criterion::Clarity => "clarte_style",
        }
    }

    /// Score used when the collaborator output cannot be parsed at all
    fn fallback_score(&self) -> f64 {
        match self {
            Criterion::Logic => 15.0,
            Criterion::Evidence => 14.0,
            Criterion::Strength => 16.0,
            Criterion::Structure => 15.0,
            Criterion::Clarity => 16.0,
        }
    }
}

/// Judgment of one user argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    #[serde(rename = "idee_principale")]
    pub idea: String,
    pub scores: BTreeMap<Criterion, f64>,
}

impl Evaluation {
    /// Record used when the collaborator output is unusable
    pub fn fallback(message: &str) -> Self {
        Self {
            idea: idea_from_message(message),
            scores: Criterion::ALL
                .iter()
                .map(|c| (*c, c.fallback_score()))
                .collect(),
        }
    }

    pub fn score(&self, criterion: Criterion) -> Option<f64> {
        self.scores.get(&criterion).copied()
    }
}

/// Outcome of validating raw collaborator output
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    /// Parsed as a JSON object; `repaired` lists criteria that were defaulted
    Accepted {
        record: Evaluation,
        repaired: Vec<Criterion>,
    },
    /// Unparsable; the fixed fallback record was used
    Fallback { record: Evaluation, reason: String },
}

impl Validated {
    pub fn record(&self) -> &Evaluation {
        match self {
            Validated::Accepted { record, .. } | Validated::Fallback { record, .. } => record,
        }
    }

    pub fn into_record(self) -> Evaluation {
        match self {
            Validated::Accepted { record, .. } | Validated::Fallback { record, .. } => record,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Validated::Fallback { .. })
    }
}

fn idea_from_message(message: &str) -> String {
    message.chars().take(IDEA_FALLBACK_CHARS).collect()
}

/// Remove a surrounding Markdown code fence (```json ... ```)
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening line
    let inner = inner.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    inner.trim_end().trim_end_matches("```").trim()
}

/// Validate and repair the evaluation collaborator's output for `message`
pub fn validate(raw: &str, message: &str) -> Validated {
    let object = match serde_json::from_str::<Value>(strip_code_fence(raw)) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            return Validated::Fallback {
                record: Evaluation::fallback(message),
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }
        }
        Err(e) => {
            return Validated::Fallback {
                record: Evaluation::fallback(message),
                reason: e.to_string(),
            }
        }
    };

    let mut repaired = Vec::new();
    let scores = Criterion::ALL
        .iter()
        .map(|criterion| {
            let value = match object.get(criterion.key()).and_then(Value::as_f64) {
                Some(v) => v.clamp(0.0, MAX_CRITERION_SCORE),
                None => {
                    repaired.push(*criterion);
                    DEFAULT_CRITERION_SCORE
                }
            };
            (*criterion, value)
        })
        .collect();

    let idea = object
        .get("idee_principale")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| idea_from_message(message));

    Validated::Accepted {
        record: Evaluation { idea, scores },
        repaired,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
