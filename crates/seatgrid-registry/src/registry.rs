//! The authoritative seat registry.
//!
//! Owns every seat record and the hold-timer table. All mutations run
//! under one `tokio::sync::Mutex`, which gives batches spanning several
//! seats the global exclusion the transition rules require. Events are
//! emitted only after the lock is dropped, so no subscriber work ever
//! happens inside the critical section.

use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info};

use seatgrid_core::config::grid::GridConfig;
use seatgrid_core::events::seat::{SeatChangeCause, SeatEvent};
use seatgrid_core::types::id::SessionId;
use seatgrid_core::types::seat::{GridSnapshot, Seat, SeatId, SeatStatus, SeatView};

use crate::error::SeatError;
use crate::expiry::TimerTable;

/// Seat occupancy counts, surfaced on the detailed health endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Occupancy {
    /// Total seats in the grid.
    pub total: usize,
    /// Seats currently available.
    pub available: usize,
    /// Seats currently held.
    pub held: usize,
    /// Seats permanently reserved.
    pub reserved: usize,
}

/// Mutable registry state. Seats and timers live under the same lock so
/// a timer fire and a manual confirm/release can never interleave.
#[derive(Debug)]
struct RegistryInner {
    seats: Vec<Seat>,
    timers: TimerTable,
}

/// The authoritative in-memory seat registry.
///
/// Created once at startup with a fixed grid; seats are never added or
/// removed afterwards. All mutation goes through the batch operations
/// below, which are atomic all-or-nothing.
#[derive(Debug)]
pub struct SeatRegistry {
    config: GridConfig,
    inner: Mutex<RegistryInner>,
    events: mpsc::UnboundedSender<SeatEvent>,
    /// Self-reference handed to spawned expiry tasks.
    weak: Weak<SeatRegistry>,
}

impl SeatRegistry {
    /// Create a registry for the configured grid.
    ///
    /// Returns the registry and the receiving end of its event stream,
    /// which the change notifier drains.
    pub fn new(config: GridConfig) -> (Arc<Self>, mpsc::UnboundedReceiver<SeatEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut seats = Vec::with_capacity(config.seat_count() as usize);
        for row in 0..config.rows {
            for col in 0..config.cols {
                seats.push(Seat::new(row, col, config.cols));
            }
        }

        info!(
            rows = config.rows,
            cols = config.cols,
            hold_ms = config.hold_duration_ms,
            "Seat registry initialized"
        );

        let registry = Arc::new_cyclic(|weak| Self {
            config,
            inner: Mutex::new(RegistryInner {
                seats,
                timers: TimerTable::new(),
            }),
            events: tx,
            weak: weak.clone(),
        });

        (registry, rx)
    }

    /// Hold a batch of seats for a session.
    ///
    /// Atomic: every id must be available or already held by `holder`
    /// (re-hold, which refreshes the expiry clock), otherwise nothing is
    /// mutated. On success each affected seat's timer is (re)armed.
    pub async fn hold(
        &self,
        ids: &[SeatId],
        holder: SessionId,
    ) -> Result<Vec<SeatView>, SeatError> {
        let ids = dedup(ids)?;
        let mut inner = self.inner.lock().await;

        // Eligibility for the whole batch is decided before any mutation.
        let mut blocked = Vec::new();
        for &id in &ids {
            let seat = seat_ref(&inner.seats, id)?;
            match seat.status {
                SeatStatus::Available => {}
                SeatStatus::Held if seat.holder == Some(holder) => {}
                _ => blocked.push(id),
            }
        }
        if !blocked.is_empty() {
            return Err(SeatError::Unavailable(blocked));
        }

        let expires_at = Utc::now() + chrono::Duration::milliseconds(self.config.hold_duration_ms as i64);
        let sleep = self.config.hold_duration() + self.config.expiry_grace();

        let RegistryInner { seats, timers } = &mut *inner;
        let mut views = Vec::with_capacity(ids.len());
        for &id in &ids {
            let seat = seat_mut(seats, id)?;
            seat.status = SeatStatus::Held;
            seat.holder = Some(holder);
            seat.hold_expires_at = Some(expires_at);
            timers.arm(self.weak.clone(), id, holder, sleep);
            views.push(seat.view());
        }
        drop(inner);

        debug!(holder = %holder, seats = views.len(), "held seats");
        self.emit(&views, SeatChangeCause::Hold);
        Ok(views)
    }

    /// Confirm a batch of held seats into permanent reservations.
    ///
    /// Atomic: every id must currently be held by `holder`. Reservations
    /// are final; there is no transition out of `Reserved`.
    pub async fn confirm(
        &self,
        ids: &[SeatId],
        holder: SessionId,
    ) -> Result<Vec<SeatView>, SeatError> {
        let ids = dedup(ids)?;
        let mut inner = self.inner.lock().await;

        let mut not_held = Vec::new();
        let mut wrong_holder = Vec::new();
        for &id in &ids {
            let seat = seat_ref(&inner.seats, id)?;
            match seat.status {
                SeatStatus::Held if seat.holder == Some(holder) => {}
                SeatStatus::Held => wrong_holder.push(id),
                _ => not_held.push(id),
            }
        }
        if !wrong_holder.is_empty() {
            return Err(SeatError::NotHolder(wrong_holder));
        }
        if !not_held.is_empty() {
            return Err(SeatError::InvalidState(not_held));
        }

        let RegistryInner { seats, timers } = &mut *inner;
        let mut views = Vec::with_capacity(ids.len());
        for &id in &ids {
            timers.cancel(id);
            let seat = seat_mut(seats, id)?;
            seat.status = SeatStatus::Reserved;
            seat.holder = None;
            seat.hold_expires_at = None;
            views.push(seat.view());
        }
        drop(inner);

        debug!(holder = %holder, seats = views.len(), "confirmed seats");
        self.emit(&views, SeatChangeCause::Confirm);
        Ok(views)
    }

    /// Release a batch of seats held by `requester`.
    ///
    /// Best-effort: ids not held by the requester are silently skipped,
    /// matching the cleanup semantics disconnect handling needs. Only
    /// ids outside the grid are an error. Returns the seats actually
    /// changed.
    pub async fn release(
        &self,
        ids: &[SeatId],
        requester: SessionId,
    ) -> Result<Vec<SeatView>, SeatError> {
        let ids = dedup(ids)?;
        let mut inner = self.inner.lock().await;

        for &id in &ids {
            seat_ref(&inner.seats, id)?;
        }

        let RegistryInner { seats, timers } = &mut *inner;
        let mut views = Vec::new();
        for &id in &ids {
            let seat = seat_mut(seats, id)?;
            if seat.status == SeatStatus::Held && seat.holder == Some(requester) {
                timers.cancel(id);
                seat.status = SeatStatus::Available;
                seat.holder = None;
                seat.hold_expires_at = None;
                views.push(seat.view());
            }
        }
        drop(inner);

        debug!(requester = %requester, seats = views.len(), "released seats");
        self.emit(&views, SeatChangeCause::Release);
        Ok(views)
    }

    /// Release every seat held by a session. System-initiated; used by
    /// the logout/disconnect cascade. Returns the seats actually changed.
    pub async fn release_all_for(&self, holder: SessionId) -> Vec<SeatView> {
        let mut inner = self.inner.lock().await;

        let RegistryInner { seats, timers } = &mut *inner;
        let mut views = Vec::new();
        for seat in seats.iter_mut() {
            if seat.status == SeatStatus::Held && seat.holder == Some(holder) {
                timers.cancel(seat.id);
                seat.status = SeatStatus::Available;
                seat.holder = None;
                seat.hold_expires_at = None;
                views.push(seat.view());
            }
        }
        drop(inner);

        if !views.is_empty() {
            info!(holder = %holder, seats = views.len(), "swept holds for ended session");
        }
        self.emit(&views, SeatChangeCause::Disconnect);
        views
    }

    /// Full public grid state, used on client (re)connect.
    pub async fn snapshot(&self) -> GridSnapshot {
        let inner = self.inner.lock().await;
        GridSnapshot {
            rows: self.config.rows,
            cols: self.config.cols,
            seats: inner.seats.iter().map(Seat::view).collect(),
        }
    }

    /// Current occupancy counts.
    pub async fn occupancy(&self) -> Occupancy {
        let inner = self.inner.lock().await;
        let mut occupancy = Occupancy {
            total: inner.seats.len(),
            available: 0,
            held: 0,
            reserved: 0,
        };
        for seat in &inner.seats {
            match seat.status {
                SeatStatus::Available => occupancy.available += 1,
                SeatStatus::Held => occupancy.held += 1,
                SeatStatus::Reserved => occupancy.reserved += 1,
            }
        }
        occupancy
    }

    /// Expiry callback, invoked by a fired hold timer.
    ///
    /// Timer firing and registry mutation are not one atomic step, so
    /// everything is re-validated here under the registry lock: the fire
    /// must carry the current generation, the seat must still be held by
    /// the session the timer was armed for, and the expiry instant must
    /// have passed. Anything else is a stale fire and a no-op.
    pub(crate) async fn on_timer_fired(&self, seat_id: SeatId, generation: u64) {
        let mut inner = self.inner.lock().await;

        let RegistryInner { seats, timers } = &mut *inner;
        let Some(holder) = timers.claim_fire(seat_id, generation) else {
            return;
        };
        let Some(seat) = seats.get_mut(seat_id.0 as usize) else {
            return;
        };

        let expired = seat.status == SeatStatus::Held
            && seat.holder == Some(holder)
            && seat
                .hold_expires_at
                .is_some_and(|at| Utc::now() >= at);
        if !expired {
            return;
        }

        seat.status = SeatStatus::Available;
        seat.holder = None;
        seat.hold_expires_at = None;
        let view = seat.view();
        drop(inner);

        debug!(seat = %seat_id, holder = %holder, "hold expired, seat auto-released");
        self.emit(std::slice::from_ref(&view), SeatChangeCause::Expiry);
    }

    /// Number of live hold timers.
    pub async fn live_timer_count(&self) -> usize {
        self.inner.lock().await.timers.live_count()
    }

    /// Expiry instant for a held seat. Test/diagnostic accessor.
    pub async fn hold_expires_at(&self, seat_id: SeatId) -> Option<DateTime<Utc>> {
        let inner = self.inner.lock().await;
        inner
            .seats
            .get(seat_id.0 as usize)
            .and_then(|s| s.hold_expires_at)
    }

    fn emit(&self, views: &[SeatView], cause: SeatChangeCause) {
        for &seat in views {
            // The receiver is only gone during shutdown; dropping the
            // event then is harmless.
            let _ = self.events.send(SeatEvent::Updated { seat, cause });
        }
    }
}

fn seat_ref(seats: &[Seat], id: SeatId) -> Result<&Seat, SeatError> {
    seats.get(id.0 as usize).ok_or(SeatError::InvalidId(id))
}

fn seat_mut(seats: &mut [Seat], id: SeatId) -> Result<&mut Seat, SeatError> {
    seats.get_mut(id.0 as usize).ok_or(SeatError::InvalidId(id))
}

/// Order-preserving dedup; a batch naming a seat twice is treated as
/// naming it once.
fn dedup(ids: &[SeatId]) -> Result<Vec<SeatId>, SeatError> {
    if ids.is_empty() {
        return Err(SeatError::EmptyBatch);
    }
    let mut out = Vec::with_capacity(ids.len());
    for &id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    Ok(out)
}
