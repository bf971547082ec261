//! Activity hub implementation
//!
//! The composition root: gate, snapshot and registry behind one lock, so
//! attaching a viewer, publishing and resetting are totally ordered. A viewer
//! therefore sees its catch-up frame first and every later event exactly
//! once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::task::TaskTracker;

use super::config::HubConfig;
use super::state::HubPhase;
use super::viewer::Viewer;
use crate::gate;
use crate::message::ActivityMessage;
use crate::registry::{ConnectionId, ConnectionRegistry, ViewerConnection};
use crate::snapshot::{system_clock, Clock, Snapshot, SnapshotStore};
use crate::stats::{HubMetrics, HubStats};

struct HubState {
    phase: HubPhase,
    snapshot: SnapshotStore,
    registry: ConnectionRegistry,
}

struct HubInner {
    config: HubConfig,
    state: Mutex<HubState>,
    next_connection_id: AtomicU64,
    /// Every live [`Viewer`] holds a token; shutdown waits for all of them
    tracker: TaskTracker,
    metrics: HubMetrics,
}

/// Live activity broadcast hub
///
/// Cheap to clone; clones share the same state. Construct one per stream
/// and hand clones to the producer and to the transport.
#[derive(Clone)]
pub struct ActivityHub {
    inner: Arc<HubInner>,
}

impl ActivityHub {
    /// Create a hub with the system clock
    pub fn new(config: HubConfig) -> Self {
        Self::with_clock(config, system_clock)
    }

    /// Create a hub with a custom timestamp source
    pub fn with_clock(config: HubConfig, clock: Clock) -> Self {
        let phase = HubPhase::initial(config.enabled);

        if phase.is_active() {
            tracing::info!(
                token_required = config.token().is_some(),
                max_viewers = config.max_viewers,
                "Activity hub enabled"
            );
        } else {
            tracing::debug!("Activity hub disabled");
        }

        Self {
            inner: Arc::new(HubInner {
                config,
                state: Mutex::new(HubState {
                    phase,
                    snapshot: SnapshotStore::with_clock(clock),
                    registry: ConnectionRegistry::new(),
                }),
                next_connection_id: AtomicU64::new(1),
                tracker: TaskTracker::new(),
                metrics: HubMetrics::new(),
            }),
        }
    }

    /// A hub that accepts nothing and ignores every call
    pub fn disabled() -> Self {
        Self::new(HubConfig::disabled())
    }

    /// Hub configuration
    pub fn config(&self) -> &HubConfig {
        &self.inner.config
    }

    /// Whether the hub was built enabled
    ///
    /// Hosts use this to decide whether to route upgrade requests here.
    pub fn is_enabled(&self) -> bool {
        self.inner.config.enabled
    }

    /// Configured access token
    pub fn access_token(&self) -> Option<&str> {
        self.inner.config.token()
    }

    /// Current lifecycle phase
    pub async fn phase(&self) -> HubPhase {
        self.inner.state.lock().await.phase
    }

    /// Whether new viewers can attach right now
    pub async fn is_accepting(&self) -> bool {
        self.is_enabled() && self.phase().await.is_active()
    }

    /// Run the access gate for a connection attempt
    ///
    /// Called before the transport upgrade. Rejections are counted; a
    /// disabled hub rejects without side effects.
    pub async fn authorize(&self, credential: Option<&str>) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let accepting = self.is_accepting().await;
        if accepting && gate::is_allowed(&self.inner.config, credential) {
            return true;
        }

        self.inner.metrics.record_rejected();
        tracing::debug!(
            accepting = accepting,
            credential_present = credential.is_some(),
            "Viewer rejected"
        );
        false
    }

    /// Register a viewer that already passed the gate
    ///
    /// The catch-up frame is queued while the hub lock is held, so no
    /// publish can slip between registration and catch-up. Returns `None` if
    /// the hub is not active or the viewer limit is reached.
    pub async fn attach(&self) -> Option<Viewer> {
        if !self.is_enabled() {
            return None;
        }

        let mut state = self.inner.state.lock().await;

        if !state.phase.is_active() {
            self.inner.metrics.record_rejected();
            tracing::debug!(phase = %state.phase, "Viewer not attached: hub not active");
            return None;
        }

        let max_viewers = self.inner.config.max_viewers;
        if max_viewers > 0 && state.registry.len() >= max_viewers {
            self.inner.metrics.record_rejected();
            tracing::warn!(limit = max_viewers, "Viewer rejected: limit reached");
            return None;
        }

        let next = self.inner.next_connection_id.fetch_add(1, Ordering::Relaxed);
        let id = ConnectionId::new(next);
        let (tx, rx) = mpsc::channel(self.inner.config.viewer_queue_capacity);
        let conn = ViewerConnection::new(id, tx);
        state.registry.add(conn.clone());

        let catch_up = match state.snapshot.get().catch_up().map(|msg| msg.encode()) {
            Some(Ok(frame)) => conn.try_send(frame).is_ok(),
            Some(Err(e)) => {
                tracing::warn!(viewer = %id, error = %e, "Failed to encode catch-up message");
                false
            }
            None => false,
        };

        let token = self.inner.tracker.token();
        let viewers = state.registry.len();
        drop(state);

        self.inner.metrics.record_accepted();
        if catch_up {
            self.inner.metrics.record_frames(1, 0);
        }

        tracing::info!(viewer = %id, viewers = viewers, catch_up = catch_up, "Viewer attached");

        Some(Viewer::new(id, rx, token))
    }

    /// Gate and attach in one step
    pub async fn handle_connection_attempt(&self, credential: Option<&str>) -> Option<Viewer> {
        if !self.authorize(credential).await {
            return None;
        }
        self.attach().await
    }

    /// Remove a viewer whose transport closed
    pub async fn disconnect(&self, id: ConnectionId) {
        let mut state = self.inner.state.lock().await;
        if let Some(conn) = state.registry.remove(id) {
            tracing::debug!(
                viewer = %id,
                viewers = state.registry.len(),
                connected_for = ?conn.duration(),
                "Viewer detached"
            );
        }
    }

    /// Replace the state and push it to every viewer
    pub async fn publish(&self, payload: impl Into<String>) {
        if !self.is_enabled() {
            return;
        }

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        if !state.phase.is_active() {
            tracing::debug!(phase = %state.phase, "Publish ignored");
            return;
        }

        let updated_at = state.snapshot.publish(payload.into());
        let msg = ActivityMessage::Push {
            jsonl: state.snapshot.get().payload.as_deref().unwrap_or_default(),
            updated_at,
        };

        self.inner.metrics.record_publish();
        self.deliver(&mut state.registry, &msg);
    }

    /// Clear the state and notify every viewer
    pub async fn reset_state(&self) {
        if !self.is_enabled() {
            return;
        }

        let mut state = self.inner.state.lock().await;
        if !state.phase.is_active() {
            tracing::debug!(phase = %state.phase, "Reset ignored");
            return;
        }

        let updated_at = state.snapshot.reset();
        let msg = ActivityMessage::Reset { updated_at };

        self.inner.metrics.record_reset();
        self.deliver(&mut state.registry, &msg);
    }

    fn deliver(&self, registry: &mut ConnectionRegistry, msg: &ActivityMessage<'_>) {
        let frame = match msg.encode() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(kind = msg.kind(), error = %e, "Failed to encode broadcast");
                return;
            }
        };

        let outcome = registry.fan_out(&frame);
        self.inner
            .metrics
            .record_frames(outcome.delivered, outcome.dropped.len());

        tracing::debug!(
            kind = msg.kind(),
            updated_at = msg.updated_at(),
            delivered = outcome.delivered,
            dropped = outcome.dropped.len(),
            "Broadcast"
        );
    }

    /// Stop accepting viewers, close all of them and wait until they are gone
    ///
    /// Idempotent. Concurrent callers all return once every viewer handle
    /// has been released.
    pub async fn shutdown(&self) {
        if !self.is_enabled() {
            return;
        }

        let drained = {
            let mut state = self.inner.state.lock().await;
            if state.phase.begin_close() {
                Some(state.registry.drain())
            } else {
                None
            }
        };

        if let Some(viewers) = drained {
            tracing::info!(viewers = viewers.len(), "Activity hub closing");
            // Dropping the senders ends every viewer's queue
            drop(viewers);
        }

        self.inner.tracker.close();
        self.inner.tracker.wait().await;

        let mut state = self.inner.state.lock().await;
        if state.phase == HubPhase::Closing {
            state.phase.finish_close();
            tracing::info!("Activity hub closed");
        }
    }

    /// Number of registered viewers
    pub async fn viewer_count(&self) -> usize {
        self.inner.state.lock().await.registry.len()
    }

    /// Copy of the current snapshot
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.state.lock().await.snapshot.current()
    }

    /// Current statistics
    pub async fn stats(&self) -> HubStats {
        let state = self.inner.state.lock().await;
        self.inner.metrics.snapshot(
            state.phase,
            state.registry.len(),
            state.snapshot.get().updated_at,
        )
    }
}

impl std::fmt::Debug for ActivityHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivityHub")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
