//! Integration tests for the health endpoints.

use http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").unwrap().as_str().unwrap(), "ok");
}

#[tokio::test]
async fn test_detailed_health_reports_occupancy() {
    let app = TestApp::new();

    // Log a user in and hold one seat through the engine.
    let (handle, _rx) = app.state.engine.connections.register();
    app.state
        .engine
        .connections
        .handle_inbound(&handle.id, r#"{"type":"login","username":"alice"}"#)
        .await;
    app.state
        .engine
        .connections
        .handle_inbound(&handle.id, r#"{"type":"hold_seats","seat_ids":[0]}"#)
        .await;

    let (status, body) = app.get("/api/health/detailed").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connections"], 1);
    assert_eq!(body["active_sessions"], 1);
    assert_eq!(body["seats"]["total"], 4);
    assert_eq!(body["seats"]["held"], 1);
    assert_eq!(body["seats"]["available"], 3);
}
