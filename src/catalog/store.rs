use super::snapshot::Snapshot;
use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Holds the current catalog snapshot.
///
/// Readers get an `Arc` to the snapshot that was current when they asked and
/// keep it for as long as they need; a publish never waits for them and never
/// exposes a half-built snapshot.
#[derive(Default)]
pub struct SnapshotStore {
    current: ArcSwapOption<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> SnapshotStore {
        SnapshotStore {
            current: ArcSwapOption::empty(),
        }
    }

    /// Replaces the current snapshot, returning the one it superseded.
    pub fn publish(&self, snapshot: Snapshot) -> Option<Arc<Snapshot>> {
        self.current.swap(Some(Arc::new(snapshot)))
    }

    /// `None` until the first publish.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    pub fn is_initialized(&self) -> bool {
        self.current.load().is_some()
    }

    /// Sequence of the current snapshot, 0 when cold.
    pub fn sequence(&self) -> u64 {
        self.current
            .load_full()
            .map(|s| s.sequence())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::build_snapshot;
    use crate::catalog::models::{RawId, RawRecord};
    use chrono::Utc;

    fn snapshot(sequence: u64, ids: &[i64]) -> Snapshot {
        let records: Vec<RawRecord> = ids
            .iter()
            .map(|id| RawRecord {
                question_frontend_id: Some(RawId::Number(*id)),
                title_slug: Some(format!("problem-{}", id)),
                difficulty: Some("Easy".to_string()),
                ..Default::default()
            })
            .collect();
        build_snapshot(&records, sequence, Utc::now()).unwrap()
    }

    #[test]
    fn starts_cold() {
        let store = SnapshotStore::new();
        assert!(store.current().is_none());
        assert!(!store.is_initialized());
        assert_eq!(store.sequence(), 0);
    }

    #[test]
    fn publish_replaces_current() {
        let store = SnapshotStore::new();
        assert!(store.publish(snapshot(1, &[1, 2])).is_none());
        assert_eq!(store.sequence(), 1);

        let previous = store.publish(snapshot(2, &[3])).unwrap();
        assert_eq!(previous.sequence(), 1);
        assert_eq!(store.current().unwrap().len(), 1);
        assert_eq!(store.sequence(), 2);
    }

    #[test]
    fn readers_keep_their_snapshot_across_publish() {
        let store = SnapshotStore::new();
        store.publish(snapshot(1, &[1, 2, 3]));
        let held = store.current().unwrap();

        store.publish(snapshot(2, &[4]));

        assert_eq!(held.sequence(), 1);
        assert_eq!(held.len(), 3);
        assert!(held.get_by_id(2).is_some());
        assert!(store.current().unwrap().get_by_id(2).is_none());
    }
}
