//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use seatgrid_core::config::AppConfig;
use seatgrid_registry::SeatRegistry;

use crate::connection::manager::ConnectionManager;
use crate::connection::pool::ConnectionPool;
use crate::notifier;
use crate::session::tracker::SessionTracker;

/// Central real-time engine coordinating registry, sessions, and
/// connections.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// The authoritative seat registry.
    pub registry: Arc<SeatRegistry>,
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Session tracker.
    pub sessions: Arc<SessionTracker>,
    /// Connection pool.
    pub pool: Arc<ConnectionPool>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: &AppConfig) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let (registry, events) = SeatRegistry::new(config.grid.clone());
        let pool = Arc::new(ConnectionPool::new());
        let sessions = Arc::new(SessionTracker::new(
            config.session.clone(),
            registry.clone(),
        ));
        let connections = Arc::new(ConnectionManager::new(
            config.realtime.clone(),
            pool.clone(),
            sessions.clone(),
            registry.clone(),
        ));
        notifier::spawn(pool.clone(), events);

        info!("Real-time engine initialized");

        Self {
            registry,
            connections,
            sessions,
            pool,
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Initiates a graceful shutdown of the real-time engine.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        let _ = self.shutdown_tx.send(());
        self.pool.close_all();
        info!("Real-time engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_engine_wires_registry_to_broadcast() {
        let engine = RealtimeEngine::new(&AppConfig::default());
        let (handle, mut rx) = engine.connections.register();

        engine
            .connections
            .handle_inbound(&handle.id, r#"{"type":"get_seats"}"#)
            .await;

        match rx.try_recv().expect("expected snapshot") {
            crate::message::types::OutboundMessage::Snapshot { rows, cols, seats } => {
                assert_eq!(rows, 8);
                assert_eq!(cols, 12);
                assert_eq!(seats.len(), 96);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
