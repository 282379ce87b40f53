//! Admin order console API
//!
//! | Path | Method | Body |
//! |------|--------|------|
//! | /api/admin/orders | GET | `?status=&page=&per_page=` |
//! | /api/admin/orders/{id} | GET | |
//! | /api/admin/orders/{id} | PATCH | `{status?, paid?}` |
//! | /api/admin/orders/{id}/cancel | POST | |
//!
//! Every route requires the admin role.

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).patch(handler::update))
        .route("/{id}/cancel", post(handler::cancel))
        .route_layer(middleware::from_fn(require_admin))
}
