use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use roster_api::{ApiError, Procedure};
use roster_protocol::{
    batch_status, is_batch_flag, BatchRequest, CallMethod, HealthResponse, ProtocolError, RpcCall,
    RpcResponse,
};

use crate::state::AppState;

/// Query parameters of the RPC endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RpcQuery {
    pub batch: Option<String>,
    /// JSON input of a GET call.
    pub input: Option<String>,
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    let procedures: Vec<_> = Procedure::ALL
        .iter()
        .map(|p| json!({ "name": p.name(), "kind": p.kind() }))
        .collect();
    Json(json!({
        "name": "roster-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": roster_protocol::PROTOCOL_VERSION,
        "procedures": procedures,
    }))
}

/// `GET /trpc/{procedures}`: queries.
pub async fn rpc_query_handler(
    State(state): State<AppState>,
    Path(procedures): Path<String>,
    query: Result<Query<RpcQuery>, QueryRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return reject(CallMethod::Get, &procedures, rejection.body_text()),
    };
    execute(&state, CallMethod::Get, &procedures, &query, query.input.as_deref())
}

/// `POST /trpc/{procedures}`: mutations, input in the body.
pub async fn rpc_mutation_handler(
    State(state): State<AppState>,
    Path(procedures): Path<String>,
    query: Result<Query<RpcQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return reject(CallMethod::Post, &procedures, rejection.body_text()),
    };
    let body = match std::str::from_utf8(&body) {
        Ok(body) => body,
        Err(e) => return reject(CallMethod::Post, &procedures, format!("body is not UTF-8: {e}")),
    };
    execute(&state, CallMethod::Post, &procedures, &query, Some(body))
}

fn execute(
    state: &AppState,
    method: CallMethod,
    procedures: &str,
    query: &RpcQuery,
    raw_input: Option<&str>,
) -> Response {
    let batched = is_batch_flag(query.batch.as_deref());
    let request = match BatchRequest::parse(
        procedures,
        batched,
        raw_input,
        state.config.max_batch_size,
    ) {
        Ok(request) => request,
        Err(err) => return protocol_failure(method, procedures, &err),
    };

    tracing::debug!(
        method = method.as_str(),
        calls = request.len(),
        batched = request.batched,
        "rpc request"
    );

    let mut responses: Vec<RpcResponse> = request
        .calls
        .iter()
        .map(|call| run_call(state, method, call))
        .collect();
    let status = status_code(batch_status(&responses));

    if request.batched {
        return (status, Json(responses)).into_response();
    }
    match responses.pop() {
        Some(response) => (status, Json(response)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// The request could not be decoded into calls at all.
fn reject(method: CallMethod, procedures: &str, detail: impl Into<String>) -> Response {
    protocol_failure(method, procedures, &ProtocolError::MalformedInput(detail.into()))
}

fn protocol_failure(method: CallMethod, procedures: &str, err: &ProtocolError) -> Response {
    tracing::warn!(
        method = method.as_str(),
        path = procedures,
        error = %err,
        "rejected rpc request"
    );
    let response = RpcResponse::from_protocol_error(err, None);
    (status_code(response.http_status()), Json(response)).into_response()
}

fn run_call(state: &AppState, method: CallMethod, call: &RpcCall) -> RpcResponse {
    let procedure = match call.resolve(method) {
        Ok(procedure) => procedure,
        Err(err) => return RpcResponse::from_protocol_error(&err, Some(&call.path)),
    };

    match state.api.call(procedure, call.input.as_ref()) {
        Ok(data) => RpcResponse::success(data),
        Err(err) => {
            if let ApiError::Internal(detail) = &err {
                tracing::error!(procedure = procedure.name(), %detail, "internal error");
            }
            RpcResponse::from_api_error(&err, Some(&call.path), state.config.error_detail())
        }
    }
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
