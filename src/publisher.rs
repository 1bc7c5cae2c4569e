// Single-slot store for the latest snapshot.
// One writer (the scheduler) and any number of readers (HTTP handlers) share
// one mutex; the critical section is an Arc swap or an Arc clone, nothing more.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::models::Snapshot;

struct Slot {
    latest: Arc<Snapshot>,
    published: u64,
}

pub struct Publisher {
    slot: Mutex<Slot>,
}

impl Default for Publisher {
    fn default() -> Self {
        Self::new()
    }
}

impl Publisher {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Slot {
                latest: Arc::new(Snapshot::empty()),
                published: 0,
            }),
        }
    }

    // The slot is only ever assigned a complete value, so a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the stored snapshot wholesale and returns the shared handle to it.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let previous = {
            let mut slot = self.lock();
            slot.published += 1;
            std::mem::replace(&mut slot.latest, snapshot.clone())
        };
        drop(previous);
        snapshot
    }

    /// Latest complete snapshot, or the empty sentinel before the first publish.
    pub fn read(&self) -> Arc<Snapshot> {
        self.lock().latest.clone()
    }

    /// Number of snapshots published so far.
    pub fn published_count(&self) -> u64 {
        self.lock().published
    }
}
