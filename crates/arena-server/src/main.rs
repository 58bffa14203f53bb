//! Arena Server - runnable entry point for the DebateMaster API
//!
//! Thin wrapper around `arena-api`; all configuration comes from the
//! environment (`ARENA_*`, `GEMINI_*`, `PORT`).

use anyhow::Result;
use arena_api::{ArenaServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    arena_api::init_tracing();

    tracing::info!("Starting DebateMaster server...");

    let config = ServerConfig::from_env();

    // A missing GEMINI_API_KEY stops startup here
    let server = ArenaServer::from_env(config).map_err(|e| {
        tracing::error!("Failed to initialize server: {}", e);
        e
    })?;

    server.run().await.map_err(|e| {
        tracing::error!("Server error during execution: {}", e);
        e
    })?;

    Ok(())
}
