//! Connection pool — tracks all active connections.

use std::sync::Arc;

use dashmap::DashMap;

use crate::message::types::OutboundMessage;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe pool of all active WebSocket connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// Connection ID → connection handle.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the pool.
    pub fn add(&self, handle: Arc<ConnectionHandle>) {
        self.by_id.insert(handle.id, handle);
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.remove(conn_id).map(|(_, handle)| handle)
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Sends a message to one connection.
    pub fn send_to(&self, conn_id: &ConnectionId, msg: OutboundMessage) -> bool {
        match self.get(conn_id) {
            Some(handle) => handle.send(msg),
            None => false,
        }
    }

    /// Broadcasts a message to every live connection.
    pub fn broadcast(&self, msg: OutboundMessage) {
        for entry in self.by_id.iter() {
            entry.value().send(msg.clone());
        }
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Closes every connection. Used during shutdown.
    pub fn close_all(&self) {
        for entry in self.by_id.iter() {
            entry.value().mark_dead();
        }
        self.by_id.clear();
    }
}
