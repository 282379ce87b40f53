//! HTTP API
//!
//! Each resource exposes `router()`; [`build_app`] merges them and adds the
//! middleware stack.

pub mod chat;
pub mod health;
pub mod orders;
pub mod reports;

use axum::{Router, middleware};
use http::HeaderName;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::middleware::{REQUEST_ID_HEADER, logging_middleware};

/// All routes, no middleware and no state
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Admin order console
        .merge(orders::router())
        // Monthly reports
        .merge(reports::router())
        // Support chat
        .merge(chat::router())
        // Public
        .merge(health::router())
}

/// Fully configured application, used by the server and by oneshot tests
pub fn build_app(state: ServerState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    build_router()
        // JWT authentication; skips public paths and injects CurrentUser
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware))
        // Request id: generated outermost, copied onto the response
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
