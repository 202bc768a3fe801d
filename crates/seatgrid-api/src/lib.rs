//! # seatgrid-api
//!
//! HTTP surface for Seatgrid built on Axum: health endpoints, the
//! WebSocket upgrade, and error mapping. All seat and session semantics
//! live behind the realtime engine; this crate is transport only.

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
