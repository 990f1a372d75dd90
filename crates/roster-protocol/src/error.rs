use roster_api::{ErrorCode, ProcedureKind};
use thiserror::Error;

/// Transport-level failures: the call never reached a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("No procedure found on path \"{0}\"")]
    UnknownProcedure(String),

    #[error("Unsupported {method} request to {kind} procedure at path \"{path}\"")]
    MethodNotSupported {
        method: String,
        kind: ProcedureKind,
        path: String,
    },

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("batch input must be an object keyed by call index")]
    InvalidBatchInput,

    #[error("batch too large: {size} calls (max {max})")]
    BatchTooLarge { size: usize, max: usize },

    #[error("empty procedure path")]
    EmptyPath,
}

impl ProtocolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownProcedure(_) => ErrorCode::NotFound,
            Self::MethodNotSupported { .. } => ErrorCode::MethodNotSupported,
            Self::MalformedInput(_) => ErrorCode::ParseError,
            Self::InvalidBatchInput | Self::BatchTooLarge { .. } | Self::EmptyPath => {
                ErrorCode::BadRequest
            }
        }
    }
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
