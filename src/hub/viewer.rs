//! Viewer handle
//!
//! Returned to whoever accepted the connection (normally the WebSocket
//! pump). Frames arrive in hub order with the catch-up frame, if any, first.
//! The hub counts a viewer as closed once this handle is dropped.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::task::task_tracker::TaskTrackerToken;

use crate::message::Frame;
use crate::registry::ConnectionId;

/// Receiving side of an attached viewer
pub struct Viewer {
    id: ConnectionId,
    rx: mpsc::Receiver<Frame>,
    _token: TaskTrackerToken,
}

impl Viewer {
    pub(super) fn new(id: ConnectionId, rx: mpsc::Receiver<Frame>, token: TaskTrackerToken) -> Self {
        Self {
            id,
            rx,
            _token: token,
        }
    }

    /// Connection identity
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Wait for the next frame
    ///
    /// Returns `None` once the hub has dropped this viewer, either on
    /// shutdown or because its queue overflowed.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }

    /// Take a frame if one is queued
    pub fn try_recv(&mut self) -> Option<Frame> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("id", &self.id)
            .field("queued", &self.rx.len())
            .finish()
    }
}
