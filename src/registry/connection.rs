//! Viewer connection handle
//!
//! The registry-side half of a viewer: an identity plus the sending end of
//! the viewer's bounded frame queue. The receiving half lives in
//! [`Viewer`](crate::hub::Viewer).

use std::time::Instant;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::message::Frame;

/// Identity of a viewer connection within one hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wrap a raw id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric id
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "viewer-{}", self.0)
    }
}

/// Why a frame could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// Viewer side is gone
    Closed,
    /// Viewer is not draining its queue
    Full,
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendError::Closed => write!(f, "viewer connection closed"),
            SendError::Full => write!(f, "viewer queue full"),
        }
    }
}

impl std::error::Error for SendError {}

/// A live viewer as tracked by the registry
#[derive(Debug, Clone)]
pub struct ViewerConnection {
    id: ConnectionId,
    tx: mpsc::Sender<Frame>,
    connected_at: Instant,
}

impl ViewerConnection {
    /// Create a connection around the sending half of its queue
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Frame>) -> Self {
        Self {
            id,
            tx,
            connected_at: Instant::now(),
        }
    }

    /// Connection identity
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Whether the viewer side still accepts frames
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// How long the viewer has been connected
    pub fn duration(&self) -> std::time::Duration {
        self.connected_at.elapsed()
    }

    /// Queue a frame without waiting
    pub fn try_send(&self, frame: Frame) -> Result<(), SendError> {
        if !self.is_open() {
            return Err(SendError::Closed);
        }
        self.tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}
