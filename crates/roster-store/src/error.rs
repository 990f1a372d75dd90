/// Errors from user store operations.
///
/// Lookups that find nothing are not errors; they return `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// The id counter cannot advance any further.
    #[error("user id space exhausted")]
    IdSpaceExhausted,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
