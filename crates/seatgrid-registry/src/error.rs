//! Seat registry error types.

use thiserror::Error;

use seatgrid_core::error::AppError;
use seatgrid_core::types::seat::SeatId;

/// Failures of registry batch operations.
///
/// Batches are all-or-nothing: when any variant is returned, no seat in
/// the requested batch was mutated. Variants carry the seat ids that
/// blocked the batch so the failure can be reported precisely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatError {
    /// A requested id is outside the configured grid.
    #[error("seat id {0} is outside the grid")]
    InvalidId(SeatId),
    /// One or more seats are reserved or held by a different session.
    #[error("seats unavailable: {}", join_ids(.0))]
    Unavailable(Vec<SeatId>),
    /// A confirm or release targeted seats held by a different session.
    #[error("seats held by another session: {}", join_ids(.0))]
    NotHolder(Vec<SeatId>),
    /// A confirm targeted seats that are not currently held.
    #[error("seats not currently held: {}", join_ids(.0))]
    InvalidState(Vec<SeatId>),
    /// An empty batch was submitted.
    #[error("no seat ids given")]
    EmptyBatch,
}

fn join_ids(ids: &[SeatId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<SeatError> for AppError {
    fn from(err: SeatError) -> Self {
        let message = err.to_string();
        match err {
            SeatError::InvalidId(_) => AppError::invalid_seat_id(message),
            SeatError::Unavailable(_) => AppError::seat_unavailable(message),
            SeatError::NotHolder(_) => AppError::not_holder(message),
            SeatError::InvalidState(_) => AppError::invalid_state(message),
            SeatError::EmptyBatch => AppError::validation(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatgrid_core::error::ErrorKind;

    #[test]
    fn test_error_message_names_blocking_seats() {
        let err = SeatError::Unavailable(vec![SeatId(3), SeatId(7)]);
        assert_eq!(err.to_string(), "seats unavailable: 3, 7");
    }

    #[test]
    fn test_maps_to_app_error_kind() {
        let app: AppError = SeatError::NotHolder(vec![SeatId(1)]).into();
        assert_eq!(app.kind, ErrorKind::NotHolder);
    }
}
