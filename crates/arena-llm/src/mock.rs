//! Mock LLM provider for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns predefined responses and records
/// every prompt it receives
#[derive(Debug)]
pub struct MockProvider {
    /// Name of this mock
    pub name: String,
    /// Canned responses (cycles through them)
    responses: Vec<String>,
    /// Error returned on every call instead of a response
    failure: Option<LlmError>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    latency: Duration,
}

impl MockProvider {
    /// Create a new mock provider with given responses
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            name: "mock".to_string(),
            responses,
            failure: None,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
        }
    }

    /// Create a mock that always returns the same response
    pub fn constant(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Create a mock that fails every call with `error`
    pub fn failing(error: LlmError) -> Self {
        Self {
            name: "failing-mock".to_string(),
            failure: Some(error),
            ..Self::new(Vec::new())
        }
    }

    /// Simulate latency on every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of completions requested so far
    pub fn calls(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Prompts received, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_available(&self) -> bool {
        self.failure.is_none()
    }

    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = Instant::now();

        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let content = if self.responses.is_empty() {
            String::new()
        } else {
            let idx = self.index.fetch_add(1, Ordering::Relaxed);
            self.responses[idx % self.responses.len()].clone()
        };

        Ok(LlmResponse {
            content,
            model: self.name.clone(),
            tokens_used: Some((request.prompt.len() / 4) as u32),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_cycles() {
        let mock = MockProvider::new(vec!["un".to_string(), "deux".to_string()]);
        assert_eq!(mock.ask("a").await.unwrap(), "un");
        assert_eq!(mock.ask("b").await.unwrap(), "deux");
        assert_eq!(mock.ask("c").await.unwrap(), "un");
        assert_eq!(mock.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockProvider::failing(LlmError::RateLimited);
        assert!(!mock.is_available().await);
        assert_eq!(mock.ask("test").await.unwrap_err(), LlmError::RateLimited);
        assert_eq!(mock.calls(), 1);
    }
}
