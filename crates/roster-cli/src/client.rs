use roster_api::Procedure;
use roster_protocol::{rpc_url, CallMethod, ErrorEnvelope, RpcResponse};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// The server answered with an error envelope.
    #[error("{}", .0.message)]
    Rpc(ErrorEnvelope),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response (HTTP {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },
}

/// Minimal HTTP client for the RPC endpoint. Sends one call per request.
pub struct RpcClient {
    base_url: String,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn call(
        &self,
        procedure: Procedure,
        input: Option<&Value>,
    ) -> Result<Value, CallError> {
        let url = rpc_url(&self.base_url, procedure.name());
        let request = match CallMethod::for_kind(procedure.kind()) {
            CallMethod::Get => {
                let request = self.http.get(url);
                match input {
                    Some(input) => request.query(&[("input", input.to_string())]),
                    None => request,
                }
            }
            CallMethod::Post => {
                let request = self.http.post(url);
                match input {
                    Some(input) => request.json(input),
                    None => request,
                }
            }
        };

        tracing::debug!(procedure = procedure.name(), "sending rpc call");
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        match serde_json::from_str::<RpcResponse>(&body) {
            Ok(envelope) => envelope.into_result().map_err(CallError::Rpc),
            Err(_) => Err(CallError::UnexpectedResponse { status, body }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_server::{RosterServer, ServerConfig};
    use serde_json::json;

    async fn spawn_server() -> (String, tokio::sync::oneshot::Sender<()>) {
        let server = RosterServer::new(ServerConfig {
            port: 0,
            ..Default::default()
        });
        let listener = server.bind().await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(server.serve_on(listener, async {
            let _ = rx.await;
        }));
        (format!("http://{addr}"), tx)
    }

    #[tokio::test]
    async fn round_trip_against_live_server() {
        let (url, _shutdown) = spawn_server().await;
        let client = RpcClient::new(url);

        let users = client.call(Procedure::GetUsers, None).await.unwrap();
        assert_eq!(users.as_array().unwrap().len(), 3);

        let bob = client
            .call(Procedure::GetUserById, Some(&json!("2")))
            .await
            .unwrap();
        assert_eq!(bob["name"], "Bob");

        let dana = client
            .call(
                Procedure::CreateUser,
                Some(&json!({"name": "Dana", "email": "dana@x.com"})),
            )
            .await
            .unwrap();
        assert_eq!(dana["id"], "4");
    }

    #[tokio::test]
    async fn error_envelope_is_surfaced() {
        let (url, _shutdown) = spawn_server().await;
        let client = RpcClient::new(url);

        let err = client
            .call(Procedure::DeleteUser, Some(&json!("77")))
            .await
            .unwrap_err();
        match err {
            CallError::Rpc(envelope) => {
                assert_eq!(envelope.data.code, "NOT_FOUND");
                assert_eq!(
                    roster_protocol::display_code(&envelope.data.code),
                    "RESOURCE_NOT_FOUND"
                );
            }
            other => panic!("expected rpc error, got {other:?}"),
        }
    }
}
