//! Coach error types

use arena_llm::LlmError;

/// Errors surfaced by the coach
#[derive(Debug, thiserror::Error)]
pub enum CoachError {
    /// Any collaborator failure, whatever its underlying kind
    #[error("Erreur génération IA : {0}")]
    GenerationFailed(String),

    #[error("Unknown mode '{0}' (expected 'train' or 'score')")]
    UnknownMode(String),
}

impl From<LlmError> for CoachError {
    fn from(e: LlmError) -> Self {
        CoachError::GenerationFailed(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_errors_collapse_to_generation_failed() {
        let err: CoachError = LlmError::ConnectionFailed("dns error".to_string()).into();
        assert!(matches!(err, CoachError::GenerationFailed(_)));
        assert_eq!(
            err.to_string(),
            "Erreur génération IA : Connection failed: dns error"
        );

        let err: CoachError = LlmError::RateLimited.into();
        assert!(err.to_string().contains("Rate limited"));
    }
}
