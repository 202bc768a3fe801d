//! # seatgrid-registry
//!
//! The authoritative in-memory seat registry and its hold-expiry
//! scheduler. Provides:
//!
//! - The per-seat state machine (`available → held → reserved`) with
//!   atomic all-or-nothing batch operations
//! - Automatic timed reversion of expired holds, race-safe against
//!   concurrent confirm/release
//! - Domain event emission for the change notifier
//!
//! Every mutation runs under one mutex covering the seat table and the
//! timer table, so a confirm and a concurrent expiry fire on the same
//! seat can never interleave. No I/O happens while the lock is held.

pub mod error;
pub mod expiry;
pub mod registry;

pub use error::SeatError;
pub use registry::{Occupancy, SeatRegistry};
