//! Connection registry implementation
//!
//! The set of live viewers. Not synchronized on its own: the hub keeps it
//! behind the same lock as the snapshot so registration, catch-up and
//! fan-out are serialized.

use std::collections::HashMap;

use super::connection::{ConnectionId, ViewerConnection};
use crate::message::Frame;

/// Outcome of one fan-out pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanOut {
    /// Viewers the frame was queued for
    pub delivered: usize,
    /// Viewers removed because the frame could not be queued
    pub dropped: Vec<ConnectionId>,
}

/// Registry of live viewer connections
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ViewerConnection>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection
    ///
    /// Returns `false` if a connection with the same id was already present;
    /// the set never holds two entries for one id.
    pub fn add(&mut self, conn: ViewerConnection) -> bool {
        self.connections.insert(conn.id(), conn).is_none()
    }

    /// Remove a connection, if present
    pub fn remove(&mut self, id: ConnectionId) -> Option<ViewerConnection> {
        self.connections.remove(&id)
    }

    /// Check membership
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.connections.contains_key(&id)
    }

    /// Number of live connections
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    /// Whether no viewers are connected
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Visit every connection present when iteration starts
    ///
    /// The membership is copied first, so `f` may add or remove entries
    /// through the registry it is handed.
    pub fn for_each<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Self, &ViewerConnection),
    {
        let members: Vec<ViewerConnection> = self.connections.values().cloned().collect();
        for conn in &members {
            f(self, conn);
        }
    }

    /// Queue a frame for every viewer, removing those that cannot take it
    pub fn fan_out(&mut self, frame: &Frame) -> FanOut {
        let mut outcome = FanOut::default();

        self.for_each(|registry, conn| match conn.try_send(frame.clone()) {
            Ok(()) => outcome.delivered += 1,
            Err(e) => {
                tracing::debug!(
                    viewer = %conn.id(),
                    error = %e,
                    connected_for = ?conn.duration(),
                    "Dropping viewer"
                );
                registry.remove(conn.id());
                outcome.dropped.push(conn.id());
            }
        });

        outcome
    }

    /// Remove and return every connection
    pub fn drain(&mut self) -> Vec<ViewerConnection> {
        self.connections.drain().map(|(_, conn)| conn).collect()
    }
}
