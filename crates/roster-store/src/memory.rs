use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::seed::SEED_USERS;
use crate::traits::{InsertOutcome, UserStore};
use crate::user::{User, UserId};

struct Inner {
    users: Vec<User>,
    next_seq: u64,
}

impl Inner {
    fn append(&mut self, name: String, email: String) -> StoreResult<User> {
        let seq = self.next_seq;
        self.next_seq = seq.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;
        let user = User::new(UserId::from_seq(seq), name, email);
        self.users.push(user.clone());
        Ok(user)
    }
}

/// In-memory, `Vec`-based user store.
///
/// Records are kept in insertion order behind a `RwLock`, so lookups from
/// concurrent requests share the lock and mutations exclude each other.
/// Ids come from a counter that only moves forward: deleting the newest
/// record does not make its id available again.
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    /// Create an empty store whose first id will be `"1"`.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                users: Vec::new(),
                next_seq: 1,
            }),
        }
    }

    /// Create a store holding the [`SEED_USERS`] records.
    pub fn seeded() -> Self {
        Self::with_users(
            SEED_USERS
                .iter()
                .map(|(name, email)| (name.to_string(), email.to_string())),
        )
    }

    /// Create a store and insert `(name, email)` pairs in order.
    pub fn with_users<I>(users: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut inner = Inner {
            users: Vec::new(),
            next_seq: 1,
        };
        for (name, email) in users {
            let seq = inner.next_seq;
            inner.users.push(User::new(UserId::from_seq(seq), name, email));
            inner.next_seq = seq + 1;
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// The sequence number the next inserted record will receive.
    pub fn next_seq(&self) -> StoreResult<u64> {
        Ok(self.read()?.next_seq)
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn list_all(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.clone())
    }

    fn find_by_id(&self, id: &UserId) -> StoreResult<Option<User>> {
        let inner = self.read()?;
        Ok(inner.users.iter().find(|u| &u.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let inner = self.read()?;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    fn insert(&self, name: String, email: String) -> StoreResult<User> {
        let user = self.write()?.append(name, email)?;
        tracing::debug!(id = %user.id, "user inserted");
        Ok(user)
    }

    fn remove_by_id(&self, id: &UserId) -> StoreResult<Option<User>> {
        let mut inner = self.write()?;
        let removed = inner
            .users
            .iter()
            .position(|u| &u.id == id)
            .map(|index| inner.users.remove(index));
        if removed.is_some() {
            tracing::debug!(%id, "user removed");
        }
        Ok(removed)
    }

    fn try_insert(&self, name: String, email: String) -> StoreResult<InsertOutcome> {
        let mut inner = self.write()?;
        if let Some(existing) = inner.users.iter().find(|u| u.email == email) {
            return Ok(InsertOutcome::EmailTaken(existing.clone()));
        }
        let user = inner.append(name, email)?;
        tracing::debug!(id = %user.id, "user inserted");
        Ok(InsertOutcome::Inserted(user))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.users.len())
    }
}

impl std::fmt::Debug for InMemoryUserStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("InMemoryUserStore");
        match self.read() {
            Ok(inner) => s
                .field("user_count", &inner.users.len())
                .field("next_seq", &inner.next_seq),
            Err(_) => s.field("poisoned", &true),
        };
        s.finish()
    }
}
