//! Seat records and their public projections.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::SessionId;

/// Stable seat identifier: `row * cols + col` within the configured grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatId(pub u32);

impl SeatId {
    /// Compute the seat id for a grid position.
    pub fn from_position(row: u32, col: u32, cols: u32) -> Self {
        Self(row * cols + col)
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SeatId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// The lifecycle state of a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    /// Free for anyone to hold.
    Available,
    /// Temporarily claimed by one session, pending confirm or expiry.
    Held,
    /// Permanently reserved. Terminal.
    Reserved,
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Held => write!(f, "held"),
            Self::Reserved => write!(f, "reserved"),
        }
    }
}

/// The authoritative seat record. Lives only inside the registry.
///
/// Invariant: `holder` and `hold_expires_at` are both `Some` iff
/// `status == Held`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seat {
    /// Stable identifier, `row * cols + col`.
    pub id: SeatId,
    /// 0-indexed row.
    pub row: u32,
    /// 0-indexed column.
    pub col: u32,
    /// Current lifecycle state.
    pub status: SeatStatus,
    /// Session holding this seat, present iff `status == Held`.
    pub holder: Option<SessionId>,
    /// When the current hold lapses, present iff `status == Held`.
    pub hold_expires_at: Option<DateTime<Utc>>,
}

impl Seat {
    /// Create a fresh available seat at a grid position.
    pub fn new(row: u32, col: u32, cols: u32) -> Self {
        Self {
            id: SeatId::from_position(row, col, cols),
            row,
            col,
            status: SeatStatus::Available,
            holder: None,
            hold_expires_at: None,
        }
    }

    /// Whether the hold-field invariant holds for this record.
    pub fn invariant_ok(&self) -> bool {
        match self.status {
            SeatStatus::Held => self.holder.is_some() && self.hold_expires_at.is_some(),
            _ => self.holder.is_none() && self.hold_expires_at.is_none(),
        }
    }

    /// The public projection of this seat. Holder identity and expiry
    /// time never leave the process.
    pub fn view(&self) -> SeatView {
        SeatView {
            id: self.id,
            row: self.row,
            col: self.col,
            status: self.status,
        }
    }
}

/// What clients are allowed to see about a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    /// Stable identifier.
    pub id: SeatId,
    /// 0-indexed row.
    pub row: u32,
    /// 0-indexed column.
    pub col: u32,
    /// Current lifecycle state.
    pub status: SeatStatus,
}

/// Full public grid state, sent on (re)connect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Number of rows.
    pub rows: u32,
    /// Number of columns.
    pub cols: u32,
    /// Every seat's public view, in id order.
    pub seats: Vec<SeatView>,
}
