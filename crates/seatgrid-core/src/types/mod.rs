//! Shared domain types.

pub mod id;
pub mod seat;

pub use id::SessionId;
pub use seat::{GridSnapshot, Seat, SeatId, SeatStatus, SeatView};
