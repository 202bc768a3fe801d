//! Domain events emitted by registry mutations.
//!
//! Events are what the registry hands to the change notifier; they are
//! plain values with no knowledge of the delivery mechanism.

pub mod seat;

pub use seat::{SeatChangeCause, SeatEvent};
