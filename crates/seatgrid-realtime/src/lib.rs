//! # seatgrid-realtime
//!
//! Real-time engine for Seatgrid. Provides:
//!
//! - WebSocket connection handles and a broadcast-capable pool
//! - Session/presence tracking with a concurrent-user cap and
//!   display-name uniqueness
//! - Inbound message routing into the seat registry
//! - The change notifier that fans registry events out to every viewer

pub mod connection;
pub mod engine;
pub mod message;
pub mod notifier;
pub mod session;

pub use connection::manager::ConnectionManager;
pub use connection::pool::ConnectionPool;
pub use engine::RealtimeEngine;
pub use session::tracker::SessionTracker;
