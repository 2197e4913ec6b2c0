//! Server-side snapshot storage boundary and per-user locking.

use crate::error::ServerResult;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tasksync_protocol::Snapshot;

/// Storage collaborator for the authoritative snapshot, one per user.
///
/// The core only reads, and writes on CLIENT_AHEAD; both happen inside
/// the per-user critical section provided by [`UserLocks`], so the
/// store itself needs no cross-call atomicity beyond per-method safety.
pub trait SnapshotStore: Send + Sync {
    /// Loads the authoritative snapshot for a user, if any.
    fn load(&self, username: &str) -> ServerResult<Option<Snapshot>>;

    /// Replaces the authoritative snapshot for a user.
    fn save(&self, username: &str, snapshot: Snapshot) -> ServerResult<()>;
}

/// In-memory snapshot store for tests and embedding.
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<String, Snapshot>>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self, username: &str) -> ServerResult<Option<Snapshot>> {
        Ok(self.snapshots.read().get(username).cloned())
    }

    fn save(&self, username: &str, snapshot: Snapshot) -> ServerResult<()> {
        self.snapshots
            .write()
            .insert(username.to_string(), snapshot);
        Ok(())
    }
}

/// Per-user mutual exclusion for the read-reconcile-write critical
/// section of the sync flow.
///
/// Concurrent sync requests for the same user serialize on one lock, so
/// the only possible race outcome is "second writer wins"; requests for
/// different users never contend.
#[derive(Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UserLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock guarding the given user's snapshot exchange.
    pub fn lock_for(&self, username: &str) -> Arc<Mutex<()>> {
        self.locks
            .lock()
            .entry(username.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
