//! Shared test helpers for integration tests.

use axum::body::Body;
use axum::Router;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use seatgrid_api::{build_router, AppState};
use seatgrid_core::config::grid::GridConfig;
use seatgrid_core::config::session::SessionConfig;
use seatgrid_core::config::AppConfig;

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Application state for driving the engine directly.
    pub state: AppState,
}

impl TestApp {
    /// Create a test application with a small grid and long holds.
    pub fn new() -> Self {
        let config = AppConfig {
            grid: GridConfig {
                rows: 2,
                cols: 2,
                hold_duration_ms: 60_000,
                expiry_grace_ms: 5,
            },
            session: SessionConfig { max_active: 5 },
            ..AppConfig::default()
        };
        Self::with_config(config)
    }

    /// Create a test application from explicit configuration.
    pub fn with_config(config: AppConfig) -> Self {
        let state = AppState::new(config);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Issue a GET request against the router, returning status and JSON body.
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("body is not JSON")
        };
        (status, body)
    }
}
