//! Typed user procedures for the Roster directory service.
//!
//! [`UserApi`] exposes `getUsers`, `getUserById`, `createUser`, and
//! `deleteUser` over a [`roster_store::UserStore`]. Inputs are validated
//! before the store is consulted, store outcomes are translated into
//! [`ApiError`]s carrying an [`ErrorCode`], and every call is timed and
//! logged.

pub mod api;
pub mod error;
pub mod middleware;
pub mod procedure;
pub mod validation;

pub use api::UserApi;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::instrumented;
pub use procedure::{Procedure, ProcedureKind};
pub use validation::{CreateUserInput, FieldError, NewUser, Validated};

// Re-export the record types callers receive.
pub use roster_store::{User, UserId};
