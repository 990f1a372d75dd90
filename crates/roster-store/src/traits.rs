use crate::error::StoreResult;
use crate::user::{User, UserId};

/// Outcome of [`UserStore::try_insert`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was appended.
    Inserted(User),
    /// A record with the same email already exists; nothing was written.
    EmailTaken(User),
}

/// Ordered collection of user records.
///
/// All implementations must satisfy these invariants:
/// - `list_all` returns records in insertion order.
/// - Every inserted record gets an id no record has ever held in this store.
/// - Each call is atomic: it either fully applies or leaves the store as it
///   was.
/// - The store does not validate names or emails. Callers do.
pub trait UserStore: Send + Sync {
    /// All records in insertion order.
    fn list_all(&self) -> StoreResult<Vec<User>>;

    /// Look up a record by id. Returns `Ok(None)` if absent.
    fn find_by_id(&self, id: &UserId) -> StoreResult<Option<User>>;

    /// Look up a record by exact email. Returns `Ok(None)` if absent.
    fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Append a new record with a freshly assigned id and return it.
    fn insert(&self, name: String, email: String) -> StoreResult<User>;

    /// Remove a record by id, returning it if it was present.
    fn remove_by_id(&self, id: &UserId) -> StoreResult<Option<User>>;

    /// Insert unless a record with `email` exists, as one atomic step.
    ///
    /// The default implementation is a check followed by an insert and is
    /// only atomic for single-threaded backends. Backends shared across
    /// threads override it.
    fn try_insert(&self, name: String, email: String) -> StoreResult<InsertOutcome> {
        if let Some(existing) = self.find_by_email(&email)? {
            return Ok(InsertOutcome::EmailTaken(existing));
        }
        self.insert(name, email).map(InsertOutcome::Inserted)
    }

    /// Number of records currently held.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.list_all()?.len())
    }

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
