//! Offline provider used for demonstrations
//!
//! Produces plausible coaching replies and well-formed JSON judgments
//! without any network access. Judgments are derived from surface features
//! of the argument (length, logical connectives, evidence markers), so the
//! same input always receives the same scores.

use async_trait::async_trait;
use serde_json::json;
use std::time::Instant;

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

const CONNECTIVES: &[&str] = &["parce que", "car ", "donc", "ainsi", "puisque", "en effet"];
/// Opening line of the coach's judgment prompt
const JUDGMENT_HEADER: &str = "Analyse ce message d'utilisateur";
const EVIDENCE_MARKERS: &[&str] = &["par exemple", "selon", "étude", "chiffre", "%", "statistique"];

/// Simulated provider
#[derive(Debug, Default)]
pub struct SimulatedProvider;

impl SimulatedProvider {
    pub fn new() -> Self {
        Self
    }

    fn is_judgment_request(prompt: &str) -> bool {
        prompt.trim_start().starts_with(JUDGMENT_HEADER)
    }

    /// The argument quoted in a judgment prompt (`Message : "..."`)
    fn quoted_message(prompt: &str) -> &str {
        prompt
            .split_once("Message : \"")
            .and_then(|(_, rest)| rest.rsplit_once('"'))
            .map(|(msg, _)| msg)
            .unwrap_or(prompt)
    }

    /// Last non-empty line of a conversational prompt, without its speaker tag
    fn last_utterance(prompt: &str) -> &str {
        let line = prompt
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();
        line.split_once(':')
            .map(|(_, rest)| rest.trim())
            .unwrap_or(line.trim())
    }

    fn judge(message: &str) -> serde_json::Value {
        let lower = message.to_lowercase();
        let has_connective = CONNECTIVES.iter().any(|c| lower.contains(c));
        let has_evidence = EVIDENCE_MARKERS.iter().any(|m| lower.contains(m))
            || lower.chars().any(|c| c.is_ascii_digit());
        let long_enough = message.chars().count() > 80;
        let sentences = message
            .split(['.', '!', '?'])
            .filter(|s| !s.trim().is_empty())
            .count();

        let bonus = |cond: bool| if cond { 4 } else { 0 };
        let clarity = if message.chars().count() <= 400 { 16 } else { 13 };
        let idea: String = message.chars().take(50).collect();

        json!({
            "idee_principale": idea,
            "logique": 12 + bonus(has_connective),
            "preuves": 11 + bonus(has_evidence),
            "force_argumentative": 12 + bonus(long_enough),
            "structure": 12 + bonus(sentences > 1),
            "clarte_style": clarity,
        })
    }

    fn reply(message: &str) -> String {
        let excerpt: String = message.chars().take(80).collect();
        format!(
            "Argument enregistré ✅ « {} »\n\n\
             Bonne piste. Pour renforcer ton argument :\n\
             - précise l'idée principale en une phrase\n\
             - appuie-la sur un exemple concret ou un chiffre\n\
             - anticipe l'objection la plus forte de ton adversaire\n\n\
             À toi : quelle preuve peux-tu apporter ?",
            excerpt
        )
    }
}

#[async_trait]
impl LlmProvider for SimulatedProvider {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();

        let content = if Self::is_judgment_request(&request.prompt) {
            Self::judge(Self::quoted_message(&request.prompt)).to_string()
        } else {
            Self::reply(Self::last_utterance(&request.prompt))
        };

        Ok(LlmResponse {
            content,
            model: "simulated".to_string(),
            tokens_used: None,
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
