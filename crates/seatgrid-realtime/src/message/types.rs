//! Inbound and outbound WebSocket message type definitions.
//!
//! Seat payloads are always [`SeatView`]: a client may learn that a seat
//! is held, never by whom.

use serde::{Deserialize, Serialize};

use seatgrid_core::types::seat::{SeatId, SeatView};

/// Messages sent by the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Request the full grid snapshot.
    GetSeats,
    /// Log in with a display name.
    Login {
        /// Chosen display name.
        username: String,
    },
    /// End the current session.
    Logout,
    /// Hold a batch of seats.
    HoldSeats {
        /// Seat ids, applied all-or-nothing.
        seat_ids: Vec<SeatId>,
    },
    /// Confirm a batch of held seats.
    ConfirmSeats {
        /// Seat ids, applied all-or-nothing.
        seat_ids: Vec<SeatId>,
    },
    /// Release a batch of held seats.
    ReleaseSeats {
        /// Seat ids; ids not held by the requester are skipped.
        seat_ids: Vec<SeatId>,
    },
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// Greeting on connect.
    Welcome {
        /// Human-readable greeting.
        message: String,
    },
    /// Full grid state, sent on connect and on request.
    Snapshot {
        /// Number of rows.
        rows: u32,
        /// Number of columns.
        cols: u32,
        /// Every seat's public view.
        seats: Vec<SeatView>,
    },
    /// A single seat changed state. Broadcast to all viewers.
    SeatUpdated {
        /// The seat's new public view.
        seat: SeatView,
    },
    /// Full active-user roster. Broadcast on every login/logout.
    Roster {
        /// Display names of all active sessions.
        users: Vec<String>,
    },
    /// Login succeeded.
    LoginOk {
        /// The accepted display name.
        username: String,
    },
    /// Logout succeeded.
    LogoutOk,
    /// An operation succeeded. Sent only to the requesting connection.
    Ack {
        /// Which operation: `hold`, `confirm`, or `release`.
        action: String,
        /// The seats the operation changed.
        seats: Vec<SeatView>,
    },
    /// An operation failed. Sent only to the requesting connection.
    Error {
        /// Wire error code (the `ErrorKind` display form).
        code: String,
        /// Human-readable message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_login_parses() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"type":"login","username":"alice"}"#).unwrap();
        assert!(matches!(msg, InboundMessage::Login { username } if username == "alice"));
    }

    #[test]
    fn test_inbound_hold_parses_ids() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"type":"hold_seats","seat_ids":[0,1,5]}"#).unwrap();
        match msg {
            InboundMessage::HoldSeats { seat_ids } => {
                assert_eq!(seat_ids, vec![SeatId(0), SeatId(1), SeatId(5)]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn test_outbound_error_shape() {
        let msg = OutboundMessage::Error {
            code: "SEAT_UNAVAILABLE".to_string(),
            message: "seats unavailable: 3".to_string(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], "SEAT_UNAVAILABLE");
    }
}
