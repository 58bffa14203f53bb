//! Mode router
//!
//! [`Coach::generate_response`] is the single entry point behind the chat
//! endpoint. Every call records the user turn and exactly one assistant
//! turn on success:
//!
//! - `train`: the reply comes from the generation collaborator.
//! - `score`: arguments are first judged by the evaluation collaborator and
//!   the judgment stored; the reply still comes from the generation
//!   collaborator. A termination phrase instead returns the final report
//!   without calling any collaborator.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use arena_llm::{LlmProvider, LlmRequest};

use crate::config::CoachConfig;
use crate::error::CoachError;
use crate::evaluation::{self, Evaluation, Validated};
use crate::mode::{is_termination_phrase, Mode};
use crate::prompt;
use crate::report::{ReportGenerator, ScoreSource};
use crate::session::{Role, SessionSnapshot, SessionStore};

/// Reply returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachReply {
    pub text: String,
    pub session_id: String,
}

/// The debate coach
#[derive(Debug)]
pub struct Coach {
    generator: Arc<dyn LlmProvider>,
    evaluator: Arc<dyn LlmProvider>,
    sessions: SessionStore,
    reports: ReportGenerator,
    context_window: usize,
}

impl Coach {
    /// Coach using `llm` for both replies and judgments, default settings
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self::with_config(llm, CoachConfig::default())
    }

    pub fn with_config(llm: Arc<dyn LlmProvider>, config: CoachConfig) -> Self {
        Self {
            generator: llm.clone(),
            evaluator: llm,
            sessions: SessionStore::with_max_turns(config.max_history_turns),
            reports: ReportGenerator::new(config.scoring),
            context_window: config.context_window,
        }
    }

    /// Use a separate collaborator for argument judgments
    pub fn with_evaluator(mut self, evaluator: Arc<dyn LlmProvider>) -> Self {
        self.evaluator = evaluator;
        self
    }

    /// Replace the score source of demonstration reports
    pub fn with_score_source(mut self, source: Arc<dyn ScoreSource>) -> Self {
        self.reports = self.reports.with_source(source);
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn provider_name(&self) -> &str {
        self.generator.name()
    }

    /// Handle one user message
    pub async fn generate_response(
        &self,
        message: &str,
        mode: Mode,
        session_id: Option<&str>,
    ) -> Result<CoachReply, CoachError> {
        let (session_id, handle) = self.sessions.get_or_create(session_id).await;
        let mut session = handle.lock().await;

        session.append_turn(Role::User, message);

        if mode == Mode::Score {
            if is_termination_phrase(message) {
                let report = self.reports.generate(session.evaluations());
                tracing::info!(
                    session_id = %session_id,
                    arguments = session.evaluations().len(),
                    score = ?report.score(),
                    "Debate concluded"
                );
                let text = report.to_string();
                session.append_turn(Role::Assistant, text.clone());
                return Ok(CoachReply { text, session_id });
            }

            let evaluation = self.evaluate_argument(message).await?;
            session.push_evaluation(evaluation);
        }

        let context = session.recent_context(self.context_window);
        let full_prompt = prompt::conversation_prompt(mode, &context, message);
        tracing::debug!(
            session_id = %session_id,
            mode = %mode,
            prompt_chars = full_prompt.len(),
            "Generating reply"
        );

        let text = self.generate(&full_prompt).await?;
        session.append_turn(Role::Assistant, text.clone());

        Ok(CoachReply { text, session_id })
    }

    /// Drop a session's history and evaluations; unknown ids are ignored
    pub async fn clear_session(&self, session_id: &str) {
        self.sessions.clear(session_id).await;
    }

    pub async fn session_snapshot(&self, session_id: &str) -> Option<SessionSnapshot> {
        let handle = self.sessions.get(session_id).await?;
        let session = handle.lock().await;
        Some(session.snapshot())
    }

    async fn generate(&self, full_prompt: &str) -> Result<String, CoachError> {
        self.generator
            .complete(LlmRequest::simple(full_prompt))
            .await
            .map(|r| r.content)
            .map_err(|e| {
                tracing::error!(provider = %self.generator.name(), error = %e, "Reply generation failed");
                e.into()
            })
    }

    async fn evaluate_argument(&self, message: &str) -> Result<Evaluation, CoachError> {
        let raw = self
            .evaluator
            .complete(LlmRequest::structured(&prompt::evaluation_prompt(message)))
            .await
            .map_err(|e| {
                tracing::error!(provider = %self.evaluator.name(), error = %e, "Argument evaluation failed");
                CoachError::from(e)
            })?
            .content;

        let validated = evaluation::validate(&raw, message);
        match &validated {
            Validated::Accepted { repaired, .. } if !repaired.is_empty() => {
                tracing::warn!(?repaired, "Evaluation repaired with default scores");
            }
            Validated::Fallback { reason, .. } => {
                tracing::warn!(%reason, "Unparsable evaluation, using fallback scores");
            }
            Validated::Accepted { .. } => {}
        }
        Ok(validated.into_record())
    }
}
