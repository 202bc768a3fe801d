//! Connection manager — connection lifecycle and inbound message routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use seatgrid_core::config::realtime::RealtimeConfig;
use seatgrid_core::error::AppError;
use seatgrid_registry::SeatRegistry;

use crate::message::types::{InboundMessage, OutboundMessage};
use crate::session::tracker::SessionTracker;

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Which batch operation a seat request maps to. The `Display` form is
/// echoed back in the `ack` payload.
#[derive(Debug, Clone, Copy)]
enum SeatAction {
    Hold,
    Confirm,
    Release,
}

impl std::fmt::Display for SeatAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hold => write!(f, "hold"),
            Self::Confirm => write!(f, "confirm"),
            Self::Release => write!(f, "release"),
        }
    }
}

/// Manages all active WebSocket connections and routes their requests
/// into the session tracker and seat registry.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<ConnectionPool>,
    sessions: Arc<SessionTracker>,
    registry: Arc<SeatRegistry>,
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        pool: Arc<ConnectionPool>,
        sessions: Arc<SessionTracker>,
        registry: Arc<SeatRegistry>,
    ) -> Self {
        Self {
            pool,
            sessions,
            registry,
            config,
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the connection handle and the receiver the transport
    /// layer forwards to the socket.
    pub fn register(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(tx));
        self.pool.add(handle.clone());

        info!(conn_id = %handle.id, "WebSocket connection registered");
        (handle, rx)
    }

    /// Unregisters a connection, ending its session if one is active.
    ///
    /// The disconnect cascade: the session's holds are released and one
    /// `seat_updated` is broadcast per released seat (through the change
    /// notifier), then the roster update goes out.
    pub async fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
        }
        if let Some((session, swept, roster)) = self.sessions.end_session(*conn_id).await {
            info!(
                conn_id = %conn_id,
                username = %session.username,
                swept = swept.len(),
                "connection closed, session ended"
            );
            self.pool.broadcast(OutboundMessage::Roster { users: roster });
        } else {
            info!(conn_id = %conn_id, "connection closed");
        }
    }

    /// Processes an inbound frame from a client.
    pub async fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let msg: InboundMessage = match serde_json::from_str(raw_message) {
            Ok(m) => m,
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "unparseable frame");
                self.reply_error(
                    conn_id,
                    &AppError::serialization(format!("failed to parse message: {e}")),
                );
                return;
            }
        };

        match msg {
            InboundMessage::GetSeats => self.handle_get_seats(conn_id).await,
            InboundMessage::Login { username } => self.handle_login(conn_id, &username),
            InboundMessage::Logout => self.handle_logout(conn_id).await,
            InboundMessage::HoldSeats { seat_ids } => {
                self.handle_seat_op(conn_id, SeatAction::Hold, seat_ids).await;
            }
            InboundMessage::ConfirmSeats { seat_ids } => {
                self.handle_seat_op(conn_id, SeatAction::Confirm, seat_ids).await;
            }
            InboundMessage::ReleaseSeats { seat_ids } => {
                self.handle_seat_op(conn_id, SeatAction::Release, seat_ids).await;
            }
        }
    }

    async fn handle_get_seats(&self, conn_id: &ConnectionId) {
        let snapshot = self.registry.snapshot().await;
        self.pool.send_to(
            conn_id,
            OutboundMessage::Snapshot {
                rows: snapshot.rows,
                cols: snapshot.cols,
                seats: snapshot.seats,
            },
        );
    }

    fn handle_login(&self, conn_id: &ConnectionId, username: &str) {
        match self.sessions.login(*conn_id, username) {
            Ok((session, roster)) => {
                self.pool.send_to(
                    conn_id,
                    OutboundMessage::LoginOk {
                        username: session.username,
                    },
                );
                self.pool.broadcast(OutboundMessage::Roster { users: roster });
            }
            Err(err) => self.reply_error(conn_id, &err.into()),
        }
    }

    async fn handle_logout(&self, conn_id: &ConnectionId) {
        match self.sessions.end_session(*conn_id).await {
            Some((_, _, roster)) => {
                self.pool.send_to(conn_id, OutboundMessage::LogoutOk);
                self.pool.broadcast(OutboundMessage::Roster { users: roster });
            }
            None => {
                self.reply_error(conn_id, &AppError::not_logged_in("no active session"));
            }
        }
    }

    async fn handle_seat_op(
        &self,
        conn_id: &ConnectionId,
        action: SeatAction,
        seat_ids: Vec<seatgrid_core::types::seat::SeatId>,
    ) {
        let session = match self.sessions.require_session(conn_id) {
            Ok(s) => s,
            Err(err) => {
                self.reply_error(conn_id, &err.into());
                return;
            }
        };

        let result = match action {
            SeatAction::Hold => self.registry.hold(&seat_ids, session.id).await,
            SeatAction::Confirm => self.registry.confirm(&seat_ids, session.id).await,
            SeatAction::Release => self.registry.release(&seat_ids, session.id).await,
        };

        match result {
            Ok(seats) => {
                self.pool.send_to(
                    conn_id,
                    OutboundMessage::Ack {
                        action: action.to_string(),
                        seats,
                    },
                );
            }
            Err(err) => self.reply_error(conn_id, &err.into()),
        }
    }

    fn reply_error(&self, conn_id: &ConnectionId, err: &AppError) {
        self.pool.send_to(
            conn_id,
            OutboundMessage::Error {
                code: err.code(),
                message: err.message.clone(),
            },
        );
    }

    /// Total active connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }
}
