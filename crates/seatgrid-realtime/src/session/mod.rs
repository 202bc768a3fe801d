//! Session and presence tracking.

pub mod tracker;

pub use tracker::{Session, SessionError, SessionTracker};
