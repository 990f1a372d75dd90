/// HTTP endpoint paths.
pub mod endpoints {
    /// Prefix of the RPC endpoint; procedure names follow after a `/`.
    pub const RPC: &str = "/trpc";
    pub const HEALTH: &str = "/v1/health";
    pub const INFO: &str = "/v1/info";
}

/// Health check response.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub protocol_version: u32,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            protocol_version: super::message::PROTOCOL_VERSION,
        }
    }
}

/// URL of the RPC endpoint for one procedure, under `base` (for example
/// `http://127.0.0.1:4000`).
pub fn rpc_url(base: &str, procedure: &str) -> String {
    format!("{}{}/{}", base.trim_end_matches('/'), endpoints::RPC, procedure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_defaults() {
        let h = HealthResponse::default();
        assert_eq!(h.status, "ok");
        assert_eq!(h.protocol_version, 1);
    }

    #[test]
    fn rpc_urls() {
        assert_eq!(
            rpc_url("http://localhost:4000", "getUsers"),
            "http://localhost:4000/trpc/getUsers"
        );
        assert_eq!(
            rpc_url("http://localhost:4000/", "deleteUser"),
            "http://localhost:4000/trpc/deleteUser"
        );
    }
}
