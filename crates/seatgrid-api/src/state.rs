//! Application state shared across all handlers.

use std::sync::Arc;

use seatgrid_core::config::AppConfig;
use seatgrid_realtime::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped or cheaply cloneable.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The real-time engine (registry, sessions, connections).
    pub engine: RealtimeEngine,
}

impl AppState {
    /// Build state from configuration, constructing the engine.
    pub fn new(config: AppConfig) -> Self {
        let engine = RealtimeEngine::new(&config);
        Self {
            config: Arc::new(config),
            engine,
        }
    }
}
