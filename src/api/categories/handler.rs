//! Category handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::Category;
use crate::utils::{AppResponse, AppResult, ok};

pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Category>>>> {
    let categories = state.catalog.list_categories().await?;
    Ok(ok(categories))
}
