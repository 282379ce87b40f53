//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::AppResult;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::OrderDetail;
use crate::orders::{OrderListQuery, OrderPage, OrderUpdateRequest};

/// List orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<OrderPage>> {
    let page = state.order_service().list(&query).await?;
    Ok(Json(page))
}

/// Order with customer and products
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.order_service().get_detail(&id).await?;
    Ok(Json(detail))
}

/// Change status and/or paid flag
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdateRequest>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state
        .order_service()
        .apply_update(&user, &id, &payload)
        .await?;
    Ok(Json(detail))
}

/// Cancel an open order
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<OrderDetail>> {
    let detail = state.order_service().cancel(&user, &id).await?;
    Ok(Json(detail))
}
