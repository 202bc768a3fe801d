//! End-to-end seat lifecycle scenario across two connections.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use seatgrid_core::types::seat::{SeatId, SeatStatus};
use seatgrid_realtime::message::types::OutboundMessage;

use crate::helpers::TestApp;

async fn recv(rx: &mut mpsc::Receiver<OutboundMessage>) -> OutboundMessage {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for message")
        .expect("channel closed")
}

/// Wait for the next seat_updated broadcast, skipping unrelated messages.
async fn next_seat_update(rx: &mut mpsc::Receiver<OutboundMessage>) -> OutboundMessage {
    loop {
        let msg = recv(rx).await;
        if matches!(msg, OutboundMessage::SeatUpdated { .. }) {
            return msg;
        }
    }
}

#[tokio::test]
async fn test_hold_confirm_disconnect_lifecycle() {
    let app = TestApp::new();
    let engine = &app.state.engine;

    let (alice_conn, mut alice_rx) = engine.connections.register();
    let (_viewer_conn, mut viewer_rx) = engine.connections.register();

    engine
        .connections
        .handle_inbound(&alice_conn.id, r#"{"type":"login","username":"alice"}"#)
        .await;
    assert!(matches!(recv(&mut alice_rx).await, OutboundMessage::LoginOk { .. }));

    // Hold both seats in one batch.
    engine
        .connections
        .handle_inbound(&alice_conn.id, r#"{"type":"hold_seats","seat_ids":[0,1]}"#)
        .await;

    let snapshot = engine.registry.snapshot().await;
    assert_eq!(snapshot.seats[0].status, SeatStatus::Held);
    assert_eq!(snapshot.seats[1].status, SeatStatus::Held);

    // The uninvolved viewer sees one broadcast per held seat.
    for _ in 0..2 {
        match next_seat_update(&mut viewer_rx).await {
            OutboundMessage::SeatUpdated { seat } => {
                assert_eq!(seat.status, SeatStatus::Held);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    // Confirm only seat 0.
    engine
        .connections
        .handle_inbound(&alice_conn.id, r#"{"type":"confirm_seats","seat_ids":[0]}"#)
        .await;

    match next_seat_update(&mut viewer_rx).await {
        OutboundMessage::SeatUpdated { seat } => {
            assert_eq!(seat.id, SeatId(0));
            assert_eq!(seat.status, SeatStatus::Reserved);
        }
        other => panic!("unexpected message: {other:?}"),
    }

    // Disconnect: seat 1 reverts, seat 0 stays reserved.
    engine.connections.unregister(&alice_conn.id).await;

    match next_seat_update(&mut viewer_rx).await {
        OutboundMessage::SeatUpdated { seat } => {
            assert_eq!(seat.id, SeatId(1));
            assert_eq!(seat.status, SeatStatus::Available);
        }
        other => panic!("unexpected message: {other:?}"),
    }

    let snapshot = engine.registry.snapshot().await;
    assert_eq!(snapshot.seats[0].status, SeatStatus::Reserved);
    assert_eq!(snapshot.seats[1].status, SeatStatus::Available);
}

#[tokio::test]
async fn test_broadcasts_never_leak_holder_identity() {
    let app = TestApp::new();
    let engine = &app.state.engine;

    let (alice_conn, _alice_rx) = engine.connections.register();
    let (_viewer_conn, mut viewer_rx) = engine.connections.register();

    engine
        .connections
        .handle_inbound(&alice_conn.id, r#"{"type":"login","username":"alice"}"#)
        .await;
    engine
        .connections
        .handle_inbound(&alice_conn.id, r#"{"type":"hold_seats","seat_ids":[2]}"#)
        .await;

    let msg = next_seat_update(&mut viewer_rx).await;
    let json = serde_json::to_value(&msg).unwrap();
    let seat = &json["seat"];
    assert_eq!(seat["status"], "held");
    assert!(seat.get("holder").is_none());
    assert!(seat.get("hold_expires_at").is_none());
}
