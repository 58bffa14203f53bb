//! # Arena API
//!
//! HTTP front for the DebateMaster coach.
//!
//! Features:
//! - Axum-based web server
//! - `POST /chat` in `train` or `score` mode
//! - Session inspection and reset
//! - Tower middleware (request id, tracing, CORS, timeout, body limit)
//! - Graceful shutdown

pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::{api_router, ChatRequest, HealthResponse};
pub use server::{init_tracing, ArenaServer, ServerConfig};
pub use state::AppState;
