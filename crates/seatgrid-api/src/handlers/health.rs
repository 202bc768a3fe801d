//! Health check handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Basic health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Detailed health response with live counters.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Active WebSocket connections.
    pub connections: usize,
    /// Active logged-in sessions.
    pub active_sessions: usize,
    /// Seat occupancy counts.
    pub seats: seatgrid_registry::Occupancy,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/health/detailed
pub async fn health_detailed(State(state): State<AppState>) -> Json<DetailedHealthResponse> {
    Json(DetailedHealthResponse {
        status: "ok".to_string(),
        connections: state.engine.connections.connection_count(),
        active_sessions: state.engine.sessions.active_count(),
        seats: state.engine.registry.occupancy().await,
    })
}
