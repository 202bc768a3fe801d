//! Change notifier — fans registry events out to connected clients.
//!
//! The registry never touches sockets; it emits [`SeatEvent`]s into a
//! channel, and the drain task here turns each one into a broadcast.
//! This keeps all delivery work outside the registry's critical section.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use seatgrid_core::events::seat::SeatEvent;

use crate::connection::pool::ConnectionPool;
use crate::message::types::OutboundMessage;

/// Spawn the drain task for a registry event stream.
///
/// The task ends when the registry (the sending side) is dropped.
pub fn spawn(
    pool: Arc<ConnectionPool>,
    mut events: mpsc::UnboundedReceiver<SeatEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                SeatEvent::Updated { seat, cause } => {
                    debug!(seat = %seat.id, ?cause, "broadcasting seat update");
                    pool.broadcast(OutboundMessage::SeatUpdated { seat });
                }
            }
        }
        debug!("seat event stream closed, notifier exiting");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use seatgrid_core::config::grid::GridConfig;
    use seatgrid_core::types::id::SessionId;
    use seatgrid_core::types::seat::SeatId;
    use seatgrid_registry::SeatRegistry;

    use crate::connection::handle::ConnectionHandle;

    #[tokio::test]
    async fn test_registry_mutation_reaches_subscribers() {
        let (registry, events) = SeatRegistry::new(GridConfig {
            rows: 2,
            cols: 2,
            hold_duration_ms: 60_000,
            expiry_grace_ms: 5,
        });
        let pool = Arc::new(ConnectionPool::new());
        let _drain = spawn(pool.clone(), events);

        let (tx, mut rx) = mpsc::channel(8);
        pool.add(Arc::new(ConnectionHandle::new(tx)));

        registry.hold(&[SeatId(0)], SessionId::new()).await.unwrap();

        // The drain task runs on the same runtime; yield until delivered.
        let msg = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for broadcast")
            .expect("channel closed");
        match msg {
            OutboundMessage::SeatUpdated { seat } => assert_eq!(seat.id, SeatId(0)),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
