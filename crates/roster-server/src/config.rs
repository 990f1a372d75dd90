use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use roster_protocol::{ErrorDetail, MAX_BATCH_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

pub const DEFAULT_PORT: u16 = 4000;

/// Environment variable overriding the listening port.
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding the listening address.
pub const HOST_ENV: &str = "HOST";
/// Environment variable selecting the run mode; `development` turns on
/// [`ServerConfig::dev_mode`].
pub const MODE_ENV: &str = "ROSTER_ENV";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Expose internal error messages to clients.
    pub dev_mode: bool,
    /// Single origin allowed by CORS. Any origin when unset.
    pub allowed_origin: Option<String>,
    pub max_batch_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            dev_mode: false,
            allowed_origin: None,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn error_detail(&self) -> ErrorDetail {
        if self.dev_mode {
            ErrorDetail::Full
        } else {
            ErrorDetail::Redacted
        }
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded server config");
        Ok(config)
    }

    /// Apply `PORT`, `HOST`, and `ROSTER_ENV` from the process environment.
    pub fn with_process_env(self) -> ServerResult<Self> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> ServerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| {
                    ServerError::Config(format!("{PORT_ENV}={port:?} is not a valid port"))
                })?;
        }
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host
                .trim()
                .parse()
                .map_err(|_| {
                    ServerError::Config(format!("{HOST_ENV}={host:?} is not an IP address"))
                })?;
        }
        if let Some(mode) = lookup(MODE_ENV) {
            self.dev_mode = mode.trim().eq_ignore_ascii_case("development");
        }
        Ok(self)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.max_batch_size == 0 {
            return Err(ServerError::Config("max_batch_size must be at least 1".into()));
        }
        if let Some(origin) = &self.allowed_origin {
            if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                return Err(ServerError::Config(format!(
                    "allowed_origin {origin:?} must start with http:// or https://"
                )));
            }
        }
        Ok(())
    }
}
