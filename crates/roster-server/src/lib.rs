//! HTTP server for the Roster directory service.
//!
//! Serves the user procedures over a single batched RPC endpoint
//! (`/trpc/{procedures}`), plus health and info endpoints.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use error::{ServerError, ServerResult};
pub use server::RosterServer;
pub use state::AppState;
