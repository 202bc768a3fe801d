//! # seatgrid-core
//!
//! Core crate for Seatgrid. Contains configuration schemas, typed
//! identifiers, seat domain types, domain events, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Seatgrid crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
