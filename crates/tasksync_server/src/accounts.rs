//! User account storage boundary.

use crate::credential::UserRecord;
use crate::error::{ServerError, ServerResult};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Storage collaborator for user records, keyed by username.
pub trait AccountStore: Send + Sync {
    /// Looks up a user record.
    fn find(&self, username: &str) -> ServerResult<Option<UserRecord>>;

    /// Creates a new user record. Fails with
    /// [`ServerError::DuplicateUser`] if the username is taken.
    fn create(&self, record: UserRecord) -> ServerResult<()>;
}

/// In-memory account store for tests and embedding.
#[derive(Default)]
pub struct MemoryAccountStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryAccountStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns true if no users are stored.
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

impl AccountStore for MemoryAccountStore {
    fn find(&self, username: &str) -> ServerResult<Option<UserRecord>> {
        Ok(self.users.read().get(username).cloned())
    }

    fn create(&self, record: UserRecord) -> ServerResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&record.username) {
            return Err(ServerError::DuplicateUser(record.username));
        }
        users.insert(record.username.clone(), record);
        Ok(())
    }
}
