//! # Arena Core
//!
//! The DebateMaster coaching engine:
//! - [`SessionStore`]: per-session turn history and evaluation records
//! - [`Coach`]: routes each message through `train` or `score` mode
//! - [`validate`]: repairs the evaluation collaborator's JSON judgments
//! - [`FinalReport`]: the end-of-debate score and feedback
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use arena_core::{Coach, Mode};
//! use arena_llm::SimulatedProvider;
//!
//! #[tokio::main]
//! async fn main() {
//!     let coach = Coach::new(Arc::new(SimulatedProvider::new()));
//!
//!     let reply = coach
//!         .generate_response("L'école devrait commencer plus tard", Mode::Score, None)
//!         .await
//!         .unwrap();
//!
//!     let report = coach
//!         .generate_response("fin", Mode::Score, Some(&reply.session_id))
//!         .await
//!         .unwrap();
//!     assert!(report.text.contains("/100"));
//! }
//! ```

pub mod coach;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod mode;
pub mod prompt;
pub mod report;
pub mod session;

pub use coach::{Coach, CoachReply};
pub use config::CoachConfig;
pub use error::CoachError;
pub use evaluation::{validate, Criterion, Evaluation, Validated};
pub use mode::{is_termination_phrase, Mode, TERMINATION_PHRASES};
pub use report::{
    FinalReport, FixedScoreSource, RandomScoreSource, ReportGenerator, ScoreSource,
    ScoringStrategy,
};
pub use session::{Role, Session, SessionHandle, SessionSnapshot, SessionStore, Turn};
