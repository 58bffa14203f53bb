//! # Arena LLM
//!
//! Generation and evaluation collaborators for the DebateMaster coach.
//!
//! ## Supported Backends
//!
//! | Provider | Type | Key Required |
//! |----------|------|--------------|
//! | Gemini | API | `GEMINI_API_KEY` |
//! | Simulated | Offline demo | None |
//! | Mock | Testing | None |
//!
//! ## Quick Start
//!
//! ```rust
//! use arena_llm::{LlmProvider, SimulatedProvider};
//!
//! #[tokio::main]
//! async fn main() {
//!     let llm = SimulatedProvider::new();
//!     let response = llm.ask("Utilisateur : Le vote devrait être obligatoire").await.unwrap();
//!     assert!(response.contains("Argument enregistré"));
//! }
//! ```
//!
//! ## With Gemini
//!
//! ```rust,ignore
//! use arena_llm::{build_provider, LlmConfig};
//!
//! let config = LlmConfig::from_env()?;
//! let llm = build_provider(&config)?; // fails fast without GEMINI_API_KEY
//! ```

pub mod config;
pub mod gemini;
pub mod mock;
pub mod provider;
pub mod simulated;

pub use config::{build_provider, ConfigError, LlmConfig, ProviderKind};
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use provider::{LlmError, LlmProvider, LlmRequest, LlmResponse};
pub use simulated::SimulatedProvider;
