use std::sync::Arc;

use roster_api::UserApi;

use crate::config::ServerConfig;

/// Shared handler state. Cloning is cheap.
#[derive(Clone, Debug)]
pub struct AppState {
    pub api: Arc<UserApi>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(api: Arc<UserApi>, config: ServerConfig) -> Self {
        Self {
            api,
            config: Arc::new(config),
        }
    }
}
