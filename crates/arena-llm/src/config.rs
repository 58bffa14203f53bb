//! Configuration management for the LLM collaborators
//!
//! Handles the API key, provider selection and model settings.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::Arc;

use crate::gemini::{GeminiProvider, GEMINI_BASE_URL, GEMINI_DEFAULT_MODEL};
use crate::provider::LlmProvider;
use crate::simulated::SimulatedProvider;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Missing environment variable: {0} (set it in your shell or .env file, or pass the key explicitly)"
    )]
    MissingEnvVar(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which collaborator backs the coach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini over HTTPS
    #[default]
    Gemini,
    /// Offline simulation, no external calls
    Simulated,
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "simulated" | "simulation" | "demo" => Ok(Self::Simulated),
            other => Err(ConfigError::Invalid(format!("unknown LLM provider '{}'", other))),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider selection (env: ARENA_LLM_PROVIDER)
    pub provider: ProviderKind,
    /// Gemini API key (env: GEMINI_API_KEY)
    pub gemini_api_key: Option<String>,
    /// Gemini model (env: GEMINI_MODEL)
    pub gemini_model: String,
    /// Gemini endpoint (env: GEMINI_BASE_URL)
    pub gemini_base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            gemini_api_key: None,
            gemini_model: GEMINI_DEFAULT_MODEL.to_string(),
            gemini_base_url: GEMINI_BASE_URL.to_string(),
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let provider = match lookup("ARENA_LLM_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => defaults.provider,
        };

        Ok(Self {
            provider,
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_model: lookup("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
        })
    }

    /// Override the API key with an explicitly supplied one
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(api_key.into());
        self
    }

    /// Use the offline simulation
    pub fn simulated() -> Self {
        Self {
            provider: ProviderKind::Simulated,
            ..Self::default()
        }
    }

    /// The Gemini key, or a fatal configuration error
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))
    }
}

/// Build the configured provider
pub fn build_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, ConfigError> {
    match config.provider {
        ProviderKind::Gemini => {
            let key = config.require_api_key()?;
            tracing::info!(model = %config.gemini_model, "Initializing Gemini provider");
            let provider = GeminiProvider::new(key, &config.gemini_model)
                .with_base_url(&config.gemini_base_url);
            Ok(Arc::new(provider))
        }
        ProviderKind::Simulated => {
            tracing::warn!("Using simulated LLM provider - replies are canned, no external calls");
            Ok(Arc::new(SimulatedProvider::new()))
        }
    }
}
