//! HTTP routes.
//!
//! One handler answers on the configured path. A path ending in `/` also
//! answers for everything beneath it, so `/` catches every request.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod replication;

use axum::{middleware, routing::any, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_STATUS;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router serving the status endpoint.
///
/// The path must already be validated by `AppConfig::validate`.
pub fn create_router(state: AppState) -> Router {
    let path = state.config.http.path.clone();

    let mut status_routes = Router::new().route(&path, any(replication::status));
    if path.ends_with('/') {
        status_routes =
            status_routes.route(&format!("{}{{*rest}}", path), any(replication::status));
    }

    status_routes
        .with_state(state)
        // Health answers must always be fresh
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATUS),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

