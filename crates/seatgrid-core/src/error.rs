//! Unified application error types for Seatgrid.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Every error here is recoverable:
//! it is reported back to the originating connection, never allowed to
//! take the process down.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
///
/// The `Display` form doubles as the wire-level error code sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested seat is not available and not held by the requester.
    SeatUnavailable,
    /// A confirm or release was attempted by a session that does not hold the seat.
    NotHolder,
    /// The seat id is outside the configured grid.
    InvalidSeatId,
    /// The seat is not in a state that permits the requested transition.
    InvalidState,
    /// The active-session cap has been reached.
    CapacityReached,
    /// The requested display name is already in use by an active session.
    NameTaken,
    /// An operation requiring identity was attempted without a session.
    NotLoggedIn,
    /// Input validation failed.
    Validation,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeatUnavailable => write!(f, "SEAT_UNAVAILABLE"),
            Self::NotHolder => write!(f, "NOT_HOLDER"),
            Self::InvalidSeatId => write!(f, "INVALID_SEAT_ID"),
            Self::InvalidState => write!(f, "INVALID_STATE"),
            Self::CapacityReached => write!(f, "CAPACITY_REACHED"),
            Self::NameTaken => write!(f, "NAME_TAKEN"),
            Self::NotLoggedIn => write!(f, "NOT_LOGGED_IN"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout Seatgrid.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a seat-unavailable error.
    pub fn seat_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SeatUnavailable, message)
    }

    /// Create a not-holder error.
    pub fn not_holder(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotHolder, message)
    }

    /// Create an invalid-seat-id error.
    pub fn invalid_seat_id(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidSeatId, message)
    }

    /// Create an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState, message)
    }

    /// Create a capacity-reached error.
    pub fn capacity_reached(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CapacityReached, message)
    }

    /// Create a name-taken error.
    pub fn name_taken(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameTaken, message)
    }

    /// Create a not-logged-in error.
    pub fn not_logged_in(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotLoggedIn, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// The wire-level error code for this error.
    pub fn code(&self) -> String {
        self.kind.to_string()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, "JSON serialization failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_is_screaming_form() {
        assert_eq!(AppError::seat_unavailable("seat 3 held").code(), "SEAT_UNAVAILABLE");
        assert_eq!(AppError::name_taken("alice").code(), "NAME_TAKEN");
    }

    #[test]
    fn test_clone_drops_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = AppError::with_source(ErrorKind::Internal, "wrapped", io);
        let cloned = err.clone();
        assert!(cloned.source.is_none());
        assert_eq!(cloned.message, "wrapped");
    }
}
