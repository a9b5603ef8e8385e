//! Order handlers
//!
//! Thin extractors over [`OrderService`]; the acting user comes from the
//! validated token.
//!
//! [`OrderService`]: crate::services::OrderService

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{
    ItemCreate, ItemStatusUpdate, ItemUpdate, Order, OrderCreate, OrderItem, OrderQuery,
    OrderStatusUpdate, OrderWithItems,
};
use crate::utils::{AppResponse, AppResult, ok, ok_created};

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<OrderQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let orders = state.orders.list_orders(&filter).await?;
    Ok(ok(orders))
}

pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<AppResponse<Order>>)> {
    let order = state.orders.create_order(user.id, &payload).await?;
    Ok(ok_created(order))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderWithItems>>> {
    let order = state.orders.get_order(id).await?;
    Ok(ok(order))
}

pub async fn update_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let order = state.orders.update_order_status(user.id, id, &payload).await?;
    Ok(ok(order))
}

pub async fn delete_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    state.orders.delete_order(user.id, id).await?;
    Ok(Json(AppResponse::message("Order deleted")))
}

pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ItemCreate>,
) -> AppResult<(StatusCode, Json<AppResponse<OrderItem>>)> {
    let item = state.orders.add_item(user.id, id, &payload).await?;
    Ok(ok_created(item))
}

pub async fn update_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ItemUpdate>,
) -> AppResult<Json<AppResponse<OrderItem>>> {
    let item = state.orders.update_item(user.id, id, &payload).await?;
    Ok(ok(item))
}

pub async fn update_item_status(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ItemStatusUpdate>,
) -> AppResult<Json<AppResponse<OrderItem>>> {
    let item = state.orders.update_item_status(user.id, id, &payload).await?;
    Ok(ok(item))
}

pub async fn delete_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<()>>> {
    state.orders.delete_item(user.id, id).await?;
    Ok(Json(AppResponse::message("Item removed")))
}
