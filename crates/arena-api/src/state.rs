//! Application State

use std::sync::Arc;

use arena_core::Coach;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    coach: Arc<Coach>,
}

impl AppState {
    pub fn new(coach: Arc<Coach>) -> Self {
        Self { coach }
    }

    /// Get the coach (cloned Arc for sharing)
    pub fn coach(&self) -> Arc<Coach> {
        self.coach.clone()
    }
}
