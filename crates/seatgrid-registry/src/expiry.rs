//! Hold-expiry timer table.
//!
//! One logical timer per held seat, keyed by seat id. Arming a timer
//! cancels and replaces any existing timer for that seat, so at most one
//! is ever in flight. Each armed timer carries a generation number drawn
//! from a monotonic counter; a fire whose generation no longer matches
//! the table entry is stale and must be ignored. The generation check
//! covers the window where an aborted task had already passed its sleep
//! and is waiting on the registry lock.

use std::collections::HashMap;
use std::sync::Weak;
use std::time::Duration;

use tokio::task::AbortHandle;
use tracing::trace;

use seatgrid_core::types::id::SessionId;
use seatgrid_core::types::seat::SeatId;

use crate::registry::SeatRegistry;

/// A live timer for one held seat.
#[derive(Debug)]
struct HoldTimer {
    /// Generation the timer was armed with.
    generation: u64,
    /// Session the hold belonged to when the timer was armed.
    holder: SessionId,
    /// Handle to abort the sleeping task on cancellation.
    abort: AbortHandle,
}

/// Timer table for all held seats. Lives inside the registry mutex, so
/// arm/cancel/claim are always serialized with seat mutations.
#[derive(Debug, Default)]
pub(crate) struct TimerTable {
    /// Monotonic generation counter, shared across all seats.
    seq: u64,
    /// Seat id → live timer. At most one entry per seat.
    timers: HashMap<SeatId, HoldTimer>,
}

impl TimerTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the expiry timer for a seat.
    ///
    /// Any previously armed timer for the seat is aborted and replaced.
    /// The spawned task sleeps for the full hold duration plus grace,
    /// then calls back into the registry, which re-validates under the
    /// registry lock before releasing anything.
    pub(crate) fn arm(
        &mut self,
        registry: Weak<SeatRegistry>,
        seat_id: SeatId,
        holder: SessionId,
        sleep: Duration,
    ) {
        self.seq += 1;
        let generation = self.seq;

        if let Some(prev) = self.timers.remove(&seat_id) {
            prev.abort.abort();
            trace!(seat = %seat_id, "replaced existing hold timer");
        }

        let task = tokio::spawn(async move {
            tokio::time::sleep(sleep).await;
            if let Some(registry) = registry.upgrade() {
                registry.on_timer_fired(seat_id, generation).await;
            }
        });

        self.timers.insert(
            seat_id,
            HoldTimer {
                generation,
                holder,
                abort: task.abort_handle(),
            },
        );
    }

    /// Cancel the timer for a seat, if one is armed.
    ///
    /// Every transition away from `Held` (confirm, release, sweep) must
    /// call this before the state change commits.
    pub(crate) fn cancel(&mut self, seat_id: SeatId) {
        if let Some(timer) = self.timers.remove(&seat_id) {
            timer.abort.abort();
        }
    }

    /// Claim a fired timer.
    ///
    /// Returns the holder the timer was armed for when the fire is
    /// current, or `None` when it is stale (the seat was re-held,
    /// confirmed, or released after this timer was scheduled).
    pub(crate) fn claim_fire(&mut self, seat_id: SeatId, generation: u64) -> Option<SessionId> {
        let current = self
            .timers
            .get(&seat_id)
            .is_some_and(|t| t.generation == generation);
        if !current {
            return None;
        }
        self.timers.remove(&seat_id).map(|t| t.holder)
    }

    /// Number of live timers. Used by tests and health reporting.
    pub(crate) fn live_count(&self) -> usize {
        self.timers.len()
    }
}
