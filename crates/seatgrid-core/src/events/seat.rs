//! Seat-related domain events.

use serde::{Deserialize, Serialize};

use crate::types::seat::SeatView;

/// Why a seat changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatChangeCause {
    /// A session acquired or extended a hold.
    Hold,
    /// A held seat was confirmed into a reservation.
    Confirm,
    /// The holder manually released the seat.
    Release,
    /// The hold timer lapsed and the seat auto-reverted.
    Expiry,
    /// The holder's session ended and its holds were swept.
    Disconnect,
}

/// Events emitted by the seat registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SeatEvent {
    /// A seat changed state.
    Updated {
        /// The seat's new public view.
        seat: SeatView,
        /// What caused the change.
        cause: SeatChangeCause,
    },
}
