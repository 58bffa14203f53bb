//! API routes for the coach

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use arena_core::{CoachReply, Mode, SessionSnapshot};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.coach().provider_name().to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Chat request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// `train` (default) or `score`
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ChatRequest {
    fn mode(&self) -> ApiResult<Mode> {
        match self.mode.as_deref() {
            None => Ok(Mode::default()),
            Some(raw) => Ok(raw.parse::<Mode>()?),
        }
    }
}

/// Chat handler
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<CoachReply>> {
    let Json(req) = payload?;
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation("message must not be empty".to_string()));
    }
    let mode = req.mode()?;

    let reply = state
        .coach()
        .generate_response(&req.message, mode, req.session_id.as_deref())
        .await?;

    Ok(Json(reply))
}

/// Clear session handler
pub async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    state.coach().clear_session(&session_id).await;
    StatusCode::NO_CONTENT
}

/// Session inspection handler
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionSnapshot>> {
    state
        .coach()
        .session_snapshot(&session_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", session_id)))
}

/// Build the API router
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/session/{id}", get(get_session).delete(clear_session))
        .with_state(state)
}
