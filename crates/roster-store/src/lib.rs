//! User record storage for the Roster directory service.
//!
//! The store is the authoritative, process-local collection of [`User`]
//! records. It is the only mutation path for user data; validation and
//! uniqueness policy live one layer up, in the API crate.
//!
//! # Storage Backends
//!
//! All backends implement the [`UserStore`] trait:
//!
//! - [`InMemoryUserStore`] -- `Vec`-backed store kept in insertion order
//!
//! # Design Rules
//!
//! 1. Records are immutable once inserted. There is no update path.
//! 2. Ids come from a monotonic counter and are never reused.
//! 3. Every operation is a single critical section with no suspension point.
//! 4. Nothing is persisted. Dropping the store drops the data.

pub mod error;
pub mod memory;
pub mod seed;
pub mod traits;
pub mod user;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryUserStore;
pub use seed::SEED_USERS;
pub use traits::{InsertOutcome, UserStore};
pub use user::{User, UserId};
