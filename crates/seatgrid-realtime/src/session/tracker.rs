//! Session/presence tracker.
//!
//! Maps connection identity to logged-in user identity, enforces the
//! concurrent-user cap and display-name uniqueness, and sweeps a
//! session's seat holds when it ends. The tracker never mutates seat
//! records itself; it goes through the registry's release operation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use seatgrid_core::config::session::SessionConfig;
use seatgrid_core::error::AppError;
use seatgrid_core::types::id::SessionId;
use seatgrid_core::types::seat::SeatView;
use seatgrid_registry::SeatRegistry;

use crate::connection::handle::ConnectionId;

/// A logged-in user bound to one active connection.
#[derive(Debug, Clone)]
pub struct Session {
    /// Identity seat holds are keyed by.
    pub id: SessionId,
    /// The connection this session lives on.
    pub conn_id: ConnectionId,
    /// Chosen display name, unique among active sessions.
    pub username: String,
    /// Login timestamp.
    pub logged_in_at: DateTime<Utc>,
}

/// Session tracker failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The active-session cap is already reached.
    #[error("maximum of {max} concurrent users reached")]
    CapacityReached {
        /// The configured cap.
        max: usize,
    },
    /// The display name is in use by another active session.
    #[error("name '{name}' is already taken")]
    NameTaken {
        /// The rejected name.
        name: String,
    },
    /// The display name is empty.
    #[error("display name must not be empty")]
    EmptyName,
    /// The connection already has an active session.
    #[error("already logged in as '{name}'")]
    AlreadyLoggedIn {
        /// The existing session's name.
        name: String,
    },
    /// The connection has no active session.
    #[error("not logged in")]
    NotLoggedIn,
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let message = err.to_string();
        match err {
            SessionError::CapacityReached { .. } => AppError::capacity_reached(message),
            SessionError::NameTaken { .. } => AppError::name_taken(message),
            SessionError::EmptyName | SessionError::AlreadyLoggedIn { .. } => {
                AppError::validation(message)
            }
            SessionError::NotLoggedIn => AppError::not_logged_in(message),
        }
    }
}

/// Tracks all active sessions.
///
/// The session map sits behind one short-lived `std::sync::Mutex` so the
/// cap check and the name-uniqueness check are atomic with respect to
/// concurrent logins. No registry call ever happens while the lock is
/// held, which keeps disconnect cleanup deadlock-free against in-flight
/// holds.
#[derive(Debug)]
pub struct SessionTracker {
    config: SessionConfig,
    registry: Arc<SeatRegistry>,
    sessions: Mutex<HashMap<ConnectionId, Session>>,
}

impl SessionTracker {
    /// Create a new session tracker.
    pub fn new(config: SessionConfig, registry: Arc<SeatRegistry>) -> Self {
        Self {
            config,
            registry,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Log a connection in under a display name.
    ///
    /// Fails `CapacityReached` at the configured cap and `NameTaken` on
    /// an exact, case-sensitive duplicate. One session per connection:
    /// a second login on the same connection is rejected.
    ///
    /// Returns the new session and the roster after the change.
    pub fn login(
        &self,
        conn_id: ConnectionId,
        username: &str,
    ) -> Result<(Session, Vec<String>), SessionError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(SessionError::EmptyName);
        }

        let mut sessions = self.lock_sessions();

        if let Some(existing) = sessions.get(&conn_id) {
            return Err(SessionError::AlreadyLoggedIn {
                name: existing.username.clone(),
            });
        }
        if sessions.len() >= self.config.max_active {
            return Err(SessionError::CapacityReached {
                max: self.config.max_active,
            });
        }
        if sessions.values().any(|s| s.username == username) {
            return Err(SessionError::NameTaken {
                name: username.to_string(),
            });
        }

        let session = Session {
            id: SessionId::new(),
            conn_id,
            username: username.to_string(),
            logged_in_at: Utc::now(),
        };
        sessions.insert(conn_id, session.clone());
        let roster = roster_of(&sessions);
        drop(sessions);

        info!(session = %session.id, username = %session.username, "user logged in");
        Ok((session, roster))
    }

    /// End the session on a connection, sweeping its seat holds.
    ///
    /// Used for both explicit logout and disconnect; a connection with
    /// no session is a no-op. Returns the ended session, the seats the
    /// sweep actually released, and the roster after the change.
    pub async fn end_session(
        &self,
        conn_id: ConnectionId,
    ) -> Option<(Session, Vec<SeatView>, Vec<String>)> {
        let (session, roster) = {
            let mut sessions = self.lock_sessions();
            let session = sessions.remove(&conn_id)?;
            let roster = roster_of(&sessions);
            (session, roster)
        };

        // The lock is released before this call: the sweep contends only
        // on the registry mutex.
        let swept = self.registry.release_all_for(session.id).await;

        info!(
            session = %session.id,
            username = %session.username,
            swept = swept.len(),
            "session ended"
        );
        Some((session, swept, roster))
    }

    /// The session active on a connection, if any.
    pub fn session_for(&self, conn_id: &ConnectionId) -> Option<Session> {
        self.lock_sessions().get(conn_id).cloned()
    }

    /// Like [`session_for`](Self::session_for) but failing `NotLoggedIn`.
    pub fn require_session(&self, conn_id: &ConnectionId) -> Result<Session, SessionError> {
        self.session_for(conn_id).ok_or(SessionError::NotLoggedIn)
    }

    /// Display names of all active sessions.
    pub fn roster(&self) -> Vec<String> {
        roster_of(&self.lock_sessions())
    }

    /// Number of active sessions.
    pub fn active_count(&self) -> usize {
        self.lock_sessions().len()
    }

    fn lock_sessions(&self) -> std::sync::MutexGuard<'_, HashMap<ConnectionId, Session>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                debug!("session map mutex poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }
}

fn roster_of(sessions: &HashMap<ConnectionId, Session>) -> Vec<String> {
    let mut names: Vec<String> = sessions.values().map(|s| s.username.clone()).collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use seatgrid_core::config::grid::GridConfig;
    use seatgrid_core::types::seat::{SeatId, SeatStatus};

    fn tracker(max_active: usize) -> (SessionTracker, Arc<SeatRegistry>) {
        let (registry, _rx) = SeatRegistry::new(GridConfig {
            rows: 2,
            cols: 2,
            hold_duration_ms: 60_000,
            expiry_grace_ms: 5,
        });
        (
            SessionTracker::new(SessionConfig { max_active }, registry.clone()),
            registry,
        )
    }

    #[tokio::test]
    async fn test_login_registers_and_reports_roster() {
        let (tracker, _registry) = tracker(5);
        let conn = Uuid::new_v4();

        let (session, roster) = tracker.login(conn, "alice").unwrap();
        assert_eq!(session.username, "alice");
        assert_eq!(roster, vec!["alice".to_string()]);
        assert_eq!(tracker.active_count(), 1);
    }

    #[tokio::test]
    async fn test_capacity_reached_leaves_count_unchanged() {
        let (tracker, _registry) = tracker(2);
        tracker.login(Uuid::new_v4(), "alice").unwrap();
        tracker.login(Uuid::new_v4(), "bob").unwrap();

        let err = tracker.login(Uuid::new_v4(), "carol").unwrap_err();
        assert_eq!(err, SessionError::CapacityReached { max: 2 });
        assert_eq!(tracker.active_count(), 2);
    }

    #[tokio::test]
    async fn test_name_taken_is_case_sensitive() {
        let (tracker, _registry) = tracker(5);
        tracker.login(Uuid::new_v4(), "alice").unwrap();

        let err = tracker.login(Uuid::new_v4(), "alice").unwrap_err();
        assert_eq!(
            err,
            SessionError::NameTaken {
                name: "alice".to_string()
            }
        );
        // Exact match only: a different casing is a different name.
        tracker.login(Uuid::new_v4(), "Alice").unwrap();
        assert_eq!(tracker.active_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let (tracker, _registry) = tracker(5);
        let err = tracker.login(Uuid::new_v4(), "   ").unwrap_err();
        assert_eq!(err, SessionError::EmptyName);
        assert_eq!(tracker.active_count(), 0);
    }

    #[tokio::test]
    async fn test_end_session_sweeps_only_own_holds() {
        let (tracker, registry) = tracker(5);
        let conn_a = Uuid::new_v4();
        let conn_b = Uuid::new_v4();
        let (alice, _) = tracker.login(conn_a, "alice").unwrap();
        let (bob, _) = tracker.login(conn_b, "bob").unwrap();

        registry.hold(&[SeatId(0), SeatId(1)], alice.id).await.unwrap();
        registry.hold(&[SeatId(2)], bob.id).await.unwrap();

        let (ended, swept, roster) = tracker.end_session(conn_a).await.unwrap();
        assert_eq!(ended.username, "alice");
        assert_eq!(swept.len(), 2);
        assert_eq!(roster, vec!["bob".to_string()]);

        let snapshot = registry.snapshot().await;
        assert_eq!(snapshot.seats[0].status, SeatStatus::Available);
        assert_eq!(snapshot.seats[1].status, SeatStatus::Available);
        assert_eq!(snapshot.seats[2].status, SeatStatus::Held);
    }

    #[tokio::test]
    async fn test_end_session_without_login_is_noop() {
        let (tracker, _registry) = tracker(5);
        assert!(tracker.end_session(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_name_becomes_free_after_logout() {
        let (tracker, _registry) = tracker(5);
        let conn = Uuid::new_v4();
        tracker.login(conn, "alice").unwrap();
        tracker.end_session(conn).await.unwrap();

        tracker.login(Uuid::new_v4(), "alice").unwrap();
        assert_eq!(tracker.active_count(), 1);
    }
}
