//! Monthly report API
//!
//! | Path | Method | Response |
//! |------|--------|----------|
//! | /api/report/export-excel?month=&year= | GET | `.xlsx` attachment |
//! | /api/report/monthly-summary?month=&year= | GET | JSON aggregation |
//!
//! Every route requires the admin role.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/report", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/export-excel", get(handler::export_excel))
        .route("/monthly-summary", get(handler::monthly_summary))
        .route_layer(middleware::from_fn(require_admin))
}
