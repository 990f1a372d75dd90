use roster_api::{ApiError, ErrorCode, FieldError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

pub const PROTOCOL_VERSION: u32 = 1;

/// Message sent in place of an internal error's detail outside
/// development mode.
pub const REDACTED_INTERNAL_MESSAGE: &str = "Internal server error";

/// Status used for a batch whose calls ended with different statuses.
pub const MULTI_STATUS: u16 = 207;

/// How much of an internal error's message reaches the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorDetail {
    Full,
    Redacted,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub data: Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorData {
    /// Wire form of an [`ErrorCode`]. Kept as a string so clients can read
    /// codes from newer servers.
    pub code: String,
    pub http_status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<FieldError>>,
}

impl ErrorData {
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_code_str(&self.code)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub message: String,
    /// JSON-RPC style numeric code.
    pub code: i32,
    pub data: ErrorData,
}

/// Outcome of one call: `{"result":{"data":..}}` or `{"error":{..}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Success { result: ResultEnvelope },
    Failure { error: ErrorEnvelope },
}

impl RpcResponse {
    pub fn success(data: Value) -> Self {
        Self::Success {
            result: ResultEnvelope { data },
        }
    }

    pub fn from_api_error(err: &ApiError, path: Option<&str>, detail: ErrorDetail) -> Self {
        let message = match (err, detail) {
            (ApiError::Internal(_), ErrorDetail::Redacted) => REDACTED_INTERNAL_MESSAGE.to_string(),
            _ => err.to_string(),
        };
        Self::failure(err.code(), message, path, err.issues().map(<[FieldError]>::to_vec))
    }

    pub fn from_protocol_error(err: &ProtocolError, path: Option<&str>) -> Self {
        Self::failure(err.code(), err.to_string(), path, None)
    }

    fn failure(
        code: ErrorCode,
        message: String,
        path: Option<&str>,
        issues: Option<Vec<FieldError>>,
    ) -> Self {
        Self::Failure {
            error: ErrorEnvelope {
                message,
                code: code.json_rpc_code(),
                data: ErrorData {
                    code: code.as_str().to_string(),
                    http_status: code.http_status(),
                    path: path.map(str::to_string),
                    issues,
                },
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Success { .. } => 200,
            Self::Failure { error } => error.data.http_status,
        }
    }

    pub fn into_result(self) -> Result<Value, ErrorEnvelope> {
        match self {
            Self::Success { result } => Ok(result.data),
            Self::Failure { error } => Err(error),
        }
    }
}

/// HTTP status for a set of call outcomes: their shared status, or
/// [`MULTI_STATUS`] when they disagree.
pub fn batch_status(responses: &[RpcResponse]) -> u16 {
    let mut statuses = responses.iter().map(RpcResponse::http_status);
    let Some(first) = statuses.next() else {
        return 200;
    };
    if statuses.all(|s| s == first) {
        first
    } else {
        MULTI_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_shape() {
        let resp = RpcResponse::success(json!([1, 2]));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"result": {"data": [1, 2]}})
        );
        assert_eq!(resp.http_status(), 200);
    }

    #[test]
    fn not_found_shape() {
        let err = ApiError::NotFound { id: "9".into() };
        let resp = RpcResponse::from_api_error(&err, Some("getUserById"), ErrorDetail::Redacted);
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"error": {
                "message": "User with id 9 not found",
                "code": -32004,
                "data": {"code": "NOT_FOUND", "httpStatus": 404, "path": "getUserById"}
            }})
        );
    }

    #[test]
    fn validation_failure_carries_issues() {
        let err = ApiError::from(vec![FieldError::new("email", "Invalid email")]);
        let resp = RpcResponse::from_api_error(&err, Some("createUser"), ErrorDetail::Full);
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["error"]["data"]["issues"][0]["path"], "email");
        assert_eq!(resp.http_status(), 400);
    }

    #[test]
    fn internal_detail_is_redacted_unless_full() {
        let err = ApiError::Internal("store lock poisoned: boom".into());

        let redacted = RpcResponse::from_api_error(&err, None, ErrorDetail::Redacted);
        let envelope = redacted.into_result().unwrap_err();
        assert_eq!(envelope.message, REDACTED_INTERNAL_MESSAGE);
        assert_eq!(envelope.data.error_code(), Some(ErrorCode::InternalServerError));

        let full = RpcResponse::from_api_error(&err, None, ErrorDetail::Full);
        assert!(full.into_result().unwrap_err().message.contains("boom"));
    }

    #[test]
    fn responses_deserialize_by_shape() {
        let ok: RpcResponse = serde_json::from_value(json!({"result": {"data": "x"}})).unwrap();
        assert!(ok.is_success());

        let failed: RpcResponse = serde_json::from_value(json!({"error": {
            "message": "slow down",
            "code": -32029,
            "data": {"code": "TOO_MANY_REQUESTS", "httpStatus": 429}
        }}))
        .unwrap();
        let envelope = failed.into_result().unwrap_err();
        assert_eq!(envelope.data.code, "TOO_MANY_REQUESTS");
        assert_eq!(envelope.data.error_code(), None);
    }

    #[test]
    fn batch_status_rules() {
        let ok = RpcResponse::success(Value::Null);
        let nf = RpcResponse::from_api_error(
            &ApiError::NotFound { id: "1".into() },
            None,
            ErrorDetail::Full,
        );
        assert_eq!(batch_status(&[]), 200);
        assert_eq!(batch_status(&[ok.clone(), ok.clone()]), 200);
        assert_eq!(batch_status(&[nf.clone(), nf.clone()]), 404);
        assert_eq!(batch_status(&[ok, nf]), MULTI_STATUS);
    }
}
