use std::fmt;

use roster_store::{StoreError, UserId};
use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

/// Machine-readable failure code carried by every error on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The request input was not valid JSON.
    ParseError,
    /// The input did not match the procedure's declared shape.
    BadRequest,
    NotFound,
    /// A query was sent as POST or a mutation as GET.
    MethodNotSupported,
    Conflict,
    InternalServerError,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 6] = [
        Self::ParseError,
        Self::BadRequest,
        Self::NotFound,
        Self::MethodNotSupported,
        Self::Conflict,
        Self::InternalServerError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            Self::Conflict => "CONFLICT",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// HTTP status a response carrying only this error should use.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ParseError | Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotSupported => 405,
            Self::Conflict => 409,
            Self::InternalServerError => 500,
        }
    }

    /// JSON-RPC 2.0 style numeric code.
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::BadRequest => -32600,
            Self::NotFound => -32004,
            Self::MethodNotSupported => -32005,
            Self::Conflict => -32009,
            Self::InternalServerError => -32603,
        }
    }

    pub fn from_code_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a user procedure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Input failed shape or constraint checks. Nothing was touched.
    #[error("{}", describe_issues(.issues))]
    ValidationFailed { issues: Vec<FieldError> },

    #[error("User with id {id} not found")]
    NotFound { id: UserId },

    #[error("User with email {email} already exists")]
    Conflict { email: String },

    /// Anything the caller could not have caused.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ValidationFailed { .. } => ErrorCode::BadRequest,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Internal(_) => ErrorCode::InternalServerError,
        }
    }

    /// Field errors, for validation failures.
    pub fn issues(&self) -> Option<&[FieldError]> {
        match self {
            Self::ValidationFailed { issues } => Some(issues),
            _ => None,
        }
    }
}

fn describe_issues(issues: &[FieldError]) -> String {
    if issues.is_empty() {
        return "invalid input".into();
    }
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<Vec<FieldError>> for ApiError {
    fn from(issues: Vec<FieldError>) -> Self {
        Self::ValidationFailed { issues }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("output encoding failed: {err}"))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
