//! Statistics for the activity hub

use std::sync::atomic::{AtomicU64, Ordering};

use crate::hub::HubPhase;

/// Hub-wide counters, updated without taking the hub lock
#[derive(Debug, Default)]
pub struct HubMetrics {
    connections_accepted: AtomicU64,
    connections_rejected: AtomicU64,
    publishes: AtomicU64,
    resets: AtomicU64,
    frames_sent: AtomicU64,
    frames_dropped: AtomicU64,
}

impl HubMetrics {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a viewer that attached
    pub fn record_accepted(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a refused connection attempt
    pub fn record_rejected(&self) {
        self.connections_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a publish
    pub fn record_publish(&self) {
        self.publishes.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a reset
    pub fn record_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one fan-out or catch-up pass
    pub fn record_frames(&self, sent: usize, dropped: usize) {
        self.frames_sent.fetch_add(sent as u64, Ordering::Relaxed);
        self.frames_dropped.fetch_add(dropped as u64, Ordering::Relaxed);
    }

    /// Combine counters with live hub state into a report
    pub fn snapshot(&self, phase: HubPhase, active_viewers: usize, updated_at: i64) -> HubStats {
        HubStats {
            phase,
            active_viewers,
            connections_accepted: self.connections_accepted.load(Ordering::Relaxed),
            connections_rejected: self.connections_rejected.load(Ordering::Relaxed),
            publishes: self.publishes.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            updated_at,
        }
    }
}

/// Point-in-time hub statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubStats {
    /// Lifecycle phase
    pub phase: HubPhase,
    /// Viewers currently registered
    pub active_viewers: usize,
    /// Viewers ever attached
    pub connections_accepted: u64,
    /// Attempts refused by the gate, the viewer limit or shutdown
    pub connections_rejected: u64,
    /// Publish calls processed
    pub publishes: u64,
    /// Reset calls processed
    pub resets: u64,
    /// Frames queued to viewers, catch-up included
    pub frames_sent: u64,
    /// Frames that could not be queued (each drops a viewer)
    pub frames_dropped: u64,
    /// Timestamp of the current snapshot, 0 if nothing happened yet
    pub updated_at: i64,
}

impl HubStats {
    /// Whether the hub was built enabled
    pub fn enabled(&self) -> bool {
        self.phase != HubPhase::Disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let stats = HubMetrics::new().snapshot(HubPhase::Active, 0, 0);

        assert!(stats.enabled());
        assert_eq!(stats.connections_accepted, 0);
        assert_eq!(stats.connections_rejected, 0);
        assert_eq!(stats.publishes, 0);
        assert_eq!(stats.resets, 0);
        assert_eq!(stats.frames_sent, 0);
        assert_eq!(stats.frames_dropped, 0);
    }

    #[test]
    fn test_metrics_record() {
        let metrics = HubMetrics::new();
        metrics.record_accepted();
        metrics.record_accepted();
        metrics.record_rejected();
        metrics.record_publish();
        metrics.record_reset();
        metrics.record_frames(3, 1);

        let stats = metrics.snapshot(HubPhase::Closing, 2, 99);
        assert_eq!(stats.connections_accepted, 2);
        assert_eq!(stats.connections_rejected, 1);
        assert_eq!(stats.publishes, 1);
        assert_eq!(stats.resets, 1);
        assert_eq!(stats.frames_sent, 3);
        assert_eq!(stats.frames_dropped, 1);
        assert_eq!(stats.active_viewers, 2);
        assert_eq!(stats.updated_at, 99);
    }

    #[test]
    fn test_disabled_stats() {
        let stats = HubMetrics::new().snapshot(HubPhase::Disabled, 0, 0);
        assert!(!stats.enabled());
    }
}
