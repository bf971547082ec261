//! Snapshot store
//!
//! Holds the latest published state for late-joiner catch-up. The store is
//! owned by the hub and only touched while the hub lock is held.

use crate::message::ActivityMessage;

/// Source of millisecond epoch timestamps
pub type Clock = fn() -> i64;

/// Wall clock in milliseconds since the Unix epoch
pub fn system_clock() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Latest state seen by the hub
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Opaque payload, `None` before the first publish or after a reset
    pub payload: Option<String>,
    /// Millisecond timestamp of the last publish or reset, 0 if none yet
    pub updated_at: i64,
}

impl Snapshot {
    /// Whether any publish or reset has happened
    pub fn has_activity(&self) -> bool {
        self.updated_at > 0
    }

    /// Message a newly attached viewer receives first, if any
    ///
    /// A published empty string still counts as a payload: the viewer gets
    /// `a2ui.state` with an empty `jsonl`, not `a2ui.reset`.
    pub fn catch_up(&self) -> Option<ActivityMessage<'_>> {
        match &self.payload {
            Some(jsonl) => Some(ActivityMessage::State {
                jsonl: jsonl.as_str(),
                updated_at: self.updated_at,
            }),
            None if self.has_activity() => Some(ActivityMessage::Reset {
                updated_at: self.updated_at,
            }),
            None => None,
        }
    }
}

/// Single-slot store for the current snapshot
#[derive(Debug)]
pub struct SnapshotStore {
    current: Snapshot,
    clock: Clock,
}

impl SnapshotStore {
    /// Create an empty store using the system clock
    pub fn new() -> Self {
        Self::with_clock(system_clock)
    }

    /// Create an empty store with a custom clock
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            current: Snapshot::default(),
            clock,
        }
    }

    /// Replace the snapshot with a payload, returning the new timestamp
    pub fn publish(&mut self, payload: String) -> i64 {
        let updated_at = self.next_timestamp();
        self.current = Snapshot {
            payload: Some(payload),
            updated_at,
        };
        updated_at
    }

    /// Clear the payload, returning the new timestamp
    pub fn reset(&mut self) -> i64 {
        let updated_at = self.next_timestamp();
        self.current = Snapshot {
            payload: None,
            updated_at,
        };
        updated_at
    }

    /// Copy of the current snapshot
    pub fn current(&self) -> Snapshot {
        self.current.clone()
    }

    /// Borrow the current snapshot
    pub fn get(&self) -> &Snapshot {
        &self.current
    }

    // Advances past the previous timestamp even if the wall clock stalls or
    // steps backwards.
    fn next_timestamp(&self) -> i64 {
        (self.clock)().max(self.current.updated_at + 1)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frozen_clock() -> i64 {
        1_000
    }

    #[test]
    fn test_empty_store() {
        let store = SnapshotStore::new();
        let snapshot = store.current();

        assert!(snapshot.payload.is_none());
        assert_eq!(snapshot.updated_at, 0);
        assert!(!snapshot.has_activity());
        assert!(snapshot.catch_up().is_none());
    }

    #[test]
    fn test_publish_sets_payload() {
        let mut store = SnapshotStore::new();
        let ts = store.publish("{\"a\":1}".to_string());

        let snapshot = store.current();
        assert_eq!(snapshot.payload.as_deref(), Some("{\"a\":1}"));
        assert_eq!(snapshot.updated_at, ts);
        assert!(ts > 0);
    }

    #[test]
    fn test_reset_clears_payload() {
        let mut store = SnapshotStore::new();
        let first = store.publish("x".to_string());
        let second = store.reset();

        let snapshot = store.current();
        assert!(snapshot.payload.is_none());
        assert!(second > first);
        assert!(snapshot.has_activity());
    }

    #[test]
    fn test_timestamp_advances_with_frozen_clock() {
        let mut store = SnapshotStore::with_clock(frozen_clock);

        let a = store.publish("same".to_string());
        let b = store.publish("same".to_string());
        let c = store.reset();

        assert_eq!(a, 1_000);
        assert_eq!(b, 1_001);
        assert_eq!(c, 1_002);
    }

    #[test]
    fn test_catch_up_variants() {
        let mut store = SnapshotStore::with_clock(frozen_clock);

        store.publish("X".to_string());
        assert_eq!(
            store.get().catch_up(),
            Some(ActivityMessage::State {
                jsonl: "X",
                updated_at: 1_000
            })
        );

        store.reset();
        assert_eq!(
            store.get().catch_up(),
            Some(ActivityMessage::Reset { updated_at: 1_001 })
        );
    }

    #[test]
    fn test_empty_payload_is_still_state() {
        let mut store = SnapshotStore::with_clock(frozen_clock);
        store.publish(String::new());

        let msg = store.get().catch_up().unwrap();
        assert_eq!(msg.kind(), "a2ui.state");
    }
}
