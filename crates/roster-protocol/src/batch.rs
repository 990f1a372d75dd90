use roster_api::{Procedure, ProcedureKind};
use serde_json::{Map, Value};

use crate::error::{ProtocolError, ProtocolResult};

/// Default upper bound on calls per batch.
pub const MAX_BATCH_SIZE: usize = 32;

/// HTTP method a call arrived with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallMethod {
    Get,
    Post,
}

impl CallMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Queries are read with GET, mutations are sent with POST.
    pub fn for_kind(kind: ProcedureKind) -> Self {
        match kind {
            ProcedureKind::Query => Self::Get,
            ProcedureKind::Mutation => Self::Post,
        }
    }
}

/// One procedure call decoded from a request.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcCall {
    pub path: String,
    pub input: Option<Value>,
}

impl RpcCall {
    /// Look up the procedure this call names and check the method fits it.
    pub fn resolve(&self, method: CallMethod) -> ProtocolResult<Procedure> {
        let procedure = Procedure::from_name(&self.path)
            .ok_or_else(|| ProtocolError::UnknownProcedure(self.path.clone()))?;
        if CallMethod::for_kind(procedure.kind()) != method {
            return Err(ProtocolError::MethodNotSupported {
                method: method.as_str().into(),
                kind: procedure.kind(),
                path: self.path.clone(),
            });
        }
        Ok(procedure)
    }
}

/// The calls carried by one HTTP request.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchRequest {
    pub calls: Vec<RpcCall>,
    /// Whether the client asked for batch framing (array responses).
    pub batched: bool,
}

impl BatchRequest {
    /// Decode a request.
    ///
    /// `paths` is the path segment after the RPC prefix. In batch mode it is
    /// a comma-separated list of procedure names and `raw_input` is a JSON
    /// object keyed by call index (`"0"`, `"1"`, ...). Otherwise `paths` is a
    /// single name and `raw_input` is that call's JSON input. An absent or
    /// blank input means the call has no input.
    pub fn parse(
        paths: &str,
        batched: bool,
        raw_input: Option<&str>,
        max_batch_size: usize,
    ) -> ProtocolResult<Self> {
        if paths.is_empty() {
            return Err(ProtocolError::EmptyPath);
        }

        let input = match raw_input.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                serde_json::from_str::<Value>(raw)
                    .map_err(|e| ProtocolError::MalformedInput(e.to_string()))?,
            ),
            None => None,
        };

        if !batched {
            return Ok(Self {
                calls: vec![RpcCall {
                    path: paths.to_string(),
                    input,
                }],
                batched,
            });
        }

        let names: Vec<&str> = paths.split(',').collect();
        if names.len() > max_batch_size {
            return Err(ProtocolError::BatchTooLarge {
                size: names.len(),
                max: max_batch_size,
            });
        }
        if names.iter().any(|n| n.is_empty()) {
            return Err(ProtocolError::EmptyPath);
        }

        let mut by_index = match input {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => return Err(ProtocolError::InvalidBatchInput),
        };

        let calls = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| RpcCall {
                path: name.to_string(),
                input: by_index.remove(&index.to_string()),
            })
            .collect();

        Ok(Self { calls, batched })
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

/// Whether the `batch` query parameter asks for batch framing.
pub fn is_batch_flag(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}
