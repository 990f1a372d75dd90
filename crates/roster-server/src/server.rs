use std::future::Future;
use std::sync::Arc;

use roster_api::UserApi;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Roster directory server.
pub struct RosterServer {
    config: ServerConfig,
    api: Arc<UserApi>,
}

impl RosterServer {
    /// A server over a freshly seeded user store.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_api(config, UserApi::seeded())
    }

    pub fn with_api(config: ServerConfig, api: UserApi) -> Self {
        Self {
            config,
            api: Arc::new(api),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.api.clone(), self.config.clone())
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        build_router(self.state())
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> ServerResult<TcpListener> {
        let addr = self.config.bind_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })
    }

    /// Serve until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = self.bind().await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.config.validate()?;
        let app = self.router()?;
        let addr = listener.local_addr()?;
        tracing::info!(
            dev_mode = self.config.dev_mode,
            "Roster server listening on {}",
            addr
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        tracing::info!("Roster server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
