//! Arena API server with graceful shutdown

use axum::{error_handling::HandleErrorLayer, middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::ServiceBuilder;

use arena_core::{Coach, CoachConfig};
use arena_llm::{build_provider, LlmConfig};

use crate::error::ApiError;
use crate::middleware::{
    body_limit_layer, cors_layer, handle_timeout_error, request_id_middleware, tracing_middleware,
};
use crate::routes::api_router;
use crate::state::AppState;

pub const DEFAULT_PORT: u16 = 8000;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server address
    pub addr: SocketAddr,
    /// Request timeout
    pub timeout: Duration,
    /// Max request body size (bytes)
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            timeout: Duration::from_secs(60),
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `ARENA_PORT` (or `PORT`) and `ARENA_TIMEOUT_SECS`; unparsable values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port: u16 = lookup("ARENA_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let timeout = lookup("ARENA_TIMEOUT_SECS")
            .and_then(|t| t.trim().parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            timeout,
            ..defaults
        }
    }
}

/// Arena API server
pub struct ArenaServer {
    config: ServerConfig,
    app_state: AppState,
}

impl ArenaServer {
    /// Create a server around an existing coach
    pub fn new(config: ServerConfig, coach: Arc<Coach>) -> Self {
        Self {
            config,
            app_state: AppState::new(coach),
        }
    }

    /// Build the coach from `ARENA_*` / `GEMINI_*` environment variables
    pub fn from_env(config: ServerConfig) -> Result<Self, ApiError> {
        let llm_config = LlmConfig::from_env()?;
        let llm = build_provider(&llm_config)?;
        let coach_config = CoachConfig::from_env()?;

        tracing::info!(
            provider = %llm.name(),
            scoring = ?coach_config.scoring,
            context_window = coach_config.context_window,
            "Coach initialized"
        );

        Ok(Self::new(config, Arc::new(Coach::with_config(llm, coach_config))))
    }

    /// Get the configured router
    pub fn router(&self) -> Router {
        api_router(self.app_state.clone())
            // Body size limit
            .layer(body_limit_layer(self.config.max_body_size))
            // Timeout, answered with the JSON error envelope
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(handle_timeout_error))
                    .timeout(self.config.timeout),
            )
            // CORS
            .layer(cors_layer())
            // Tracing (sees the request id set by the outer layer)
            .layer(middleware::from_fn(tracing_middleware))
            // Request ID (outermost)
            .layer(middleware::from_fn(request_id_middleware))
    }

    /// Run the server with graceful shutdown
    pub async fn run(self) -> Result<(), ApiError> {
        let app = self.router();
        let addr = self.config.addr;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Arena API listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Initialize tracing subscriber
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,arena_api=debug,arena_core=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
