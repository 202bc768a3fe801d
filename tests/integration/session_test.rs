//! Integration tests for login capacity and presence broadcasts.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use seatgrid_realtime::message::types::OutboundMessage;

use crate::helpers::TestApp;

async fn recv(rx: &mut mpsc::Receiver<OutboundMessage>) -> OutboundMessage {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("channel closed")
}

/// Wait for the next error reply, skipping roster and seat broadcasts.
async fn next_error(rx: &mut mpsc::Receiver<OutboundMessage>) -> (String, String) {
    loop {
        if let OutboundMessage::Error { code, message } = recv(rx).await {
            return (code, message);
        }
    }
}

#[tokio::test]
async fn test_capacity_cap_and_name_uniqueness() {
    let app = TestApp::new();
    let engine = &app.state.engine;

    let mut conns = Vec::new();
    for i in 0..5 {
        let (handle, rx) = engine.connections.register();
        engine
            .connections
            .handle_inbound(
                &handle.id,
                &format!(r#"{{"type":"login","username":"user{i}"}}"#),
            )
            .await;
        conns.push((handle, rx));
    }
    assert_eq!(engine.sessions.active_count(), 5);

    // Sixth login hits the cap.
    let (extra, mut extra_rx) = engine.connections.register();
    engine
        .connections
        .handle_inbound(&extra.id, r#"{"type":"login","username":"late"}"#)
        .await;
    let (code, _) = next_error(&mut extra_rx).await;
    assert_eq!(code, "CAPACITY_REACHED");
    assert_eq!(engine.sessions.active_count(), 5);

    // Free a slot, then a duplicate name is still rejected.
    engine.connections.unregister(&conns[0].0.id).await;
    assert_eq!(engine.sessions.active_count(), 4);

    engine
        .connections
        .handle_inbound(&extra.id, r#"{"type":"login","username":"user1"}"#)
        .await;
    let (code, _) = next_error(&mut extra_rx).await;
    assert_eq!(code, "NAME_TAKEN");
    assert_eq!(engine.sessions.active_count(), 4);
}

#[tokio::test]
async fn test_roster_broadcast_on_login_and_logout() {
    let app = TestApp::new();
    let engine = &app.state.engine;

    let (alice, mut alice_rx) = engine.connections.register();
    let (bob, mut bob_rx) = engine.connections.register();

    engine
        .connections
        .handle_inbound(&alice.id, r#"{"type":"login","username":"alice"}"#)
        .await;

    // Both connections get the full roster, logged in or not.
    assert!(matches!(recv(&mut alice_rx).await, OutboundMessage::LoginOk { .. }));
    match recv(&mut alice_rx).await {
        OutboundMessage::Roster { users } => assert_eq!(users, vec!["alice".to_string()]),
        other => panic!("unexpected message: {other:?}"),
    }
    match recv(&mut bob_rx).await {
        OutboundMessage::Roster { users } => assert_eq!(users, vec!["alice".to_string()]),
        other => panic!("unexpected message: {other:?}"),
    }

    engine
        .connections
        .handle_inbound(&bob.id, r#"{"type":"login","username":"bob"}"#)
        .await;
    engine
        .connections
        .handle_inbound(&alice.id, r#"{"type":"logout"}"#)
        .await;

    // Alice's logout leaves only bob on the roster.
    let mut last_roster = None;
    while let Ok(Some(msg)) = timeout(Duration::from_millis(200), bob_rx.recv()).await {
        if let OutboundMessage::Roster { users } = msg {
            last_roster = Some(users);
        }
    }
    assert_eq!(last_roster, Some(vec!["bob".to_string()]));
}

#[tokio::test]
async fn test_logout_without_session_errors() {
    let app = TestApp::new();
    let engine = &app.state.engine;

    let (handle, mut rx) = engine.connections.register();
    engine
        .connections
        .handle_inbound(&handle.id, r#"{"type":"logout"}"#)
        .await;

    match recv(&mut rx).await {
        OutboundMessage::Error { code, .. } => assert_eq!(code, "NOT_LOGGED_IN"),
        other => panic!("unexpected message: {other:?}"),
    }
}
