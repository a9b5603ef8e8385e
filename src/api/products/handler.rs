//! Product handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::core::ServerState;
use crate::db::models::{Product, ProductQuery};
use crate::utils::{AppResponse, AppResult, ok};

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<ProductQuery>,
) -> AppResult<Json<AppResponse<Vec<Product>>>> {
    let products = state.catalog.list_products(&filter).await?;
    Ok(ok(products))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Product>>> {
    let product = state.catalog.get_product(id).await?;
    Ok(ok(product))
}
