//! Wire protocol for the Roster directory service.
//!
//! Defines how procedure calls travel over the single RPC endpoint: path
//! and input decoding (single or batched), the success and error
//! envelopes, batch status aggregation, and the display codes clients show
//! for wire error codes.

pub mod batch;
pub mod display;
pub mod endpoint;
pub mod error;
pub mod message;

pub use batch::{is_batch_flag, BatchRequest, CallMethod, RpcCall, MAX_BATCH_SIZE};
pub use display::{display_code, UNKNOWN_ERROR};
pub use endpoint::{endpoints, rpc_url, HealthResponse};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    batch_status, ErrorData, ErrorDetail, ErrorEnvelope, ResultEnvelope, RpcResponse,
    MULTI_STATUS, PROTOCOL_VERSION, REDACTED_INTERNAL_MESSAGE,
};
