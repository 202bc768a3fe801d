//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use tracing::{info, warn};

use seatgrid_realtime::message::types::OutboundMessage;

use crate::state::AppState;

/// GET /ws — WebSocket upgrade.
///
/// No token: connecting is anonymous, identity is established by an
/// in-protocol `login` message.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_ws_connection(state, socket))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, socket: WebSocket) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let (handle, mut outbound_rx) = state.engine.connections.register();
    let conn_id = handle.id;

    info!(conn_id = %conn_id, "WebSocket connection established");

    // Greet and push the full grid before processing anything else.
    handle.send(OutboundMessage::Welcome {
        message: "Welcome to the Seatgrid realtime API".to_string(),
    });
    let snapshot = state.engine.registry.snapshot().await;
    handle.send(OutboundMessage::Snapshot {
        rows: snapshot.rows,
        cols: snapshot.cols,
        seats: snapshot.seats,
    });

    // Outbound message forwarder.
    let outbound_task = tokio::spawn(async move {
        while let Some(msg) = outbound_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "failed to serialize outbound message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Inbound pump.
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(Message::Text(text)) => {
                state
                    .engine
                    .connections
                    .handle_inbound(&conn_id, text.as_str())
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                break;
            }
        }
    }

    // Cleanup: the disconnect cascade releases this session's holds.
    outbound_task.abort();
    state.engine.connections.unregister(&conn_id).await;

    info!(conn_id = %conn_id, "WebSocket connection closed");
}
