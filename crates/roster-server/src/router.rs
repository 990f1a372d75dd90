use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Router};
use roster_protocol::endpoints;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::{ServerError, ServerResult};
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all Roster endpoints.
pub fn build_router(state: AppState) -> ServerResult<Router> {
    let cors = cors_layer(state.config.allowed_origin.as_deref())?;
    let rpc_path = format!("{}/:procedures", endpoints::RPC);

    Ok(Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler))
        .route(
            &rpc_path,
            get(handler::rpc_query_handler).post(handler::rpc_mutation_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

fn cors_layer(allowed_origin: Option<&str>) -> ServerResult<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    match allowed_origin {
        None => Ok(layer.allow_origin(Any)),
        Some(origin) => {
            let value = HeaderValue::from_str(origin).map_err(|e| {
                ServerError::Config(format!("invalid allowed_origin {origin:?}: {e}"))
            })?;
            Ok(layer.allow_origin(value))
        }
    }
}
