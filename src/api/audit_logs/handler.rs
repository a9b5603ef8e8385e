//! Audit trail handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::db::models::{AuditEntry, AuditQuery, ChainReport};
use crate::db::repository;
use crate::utils::{AppResponse, AppResult, ok};

pub async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<AuditQuery>,
) -> AppResult<Json<AppResponse<Vec<AuditEntry>>>> {
    let entries = repository::audit::find_all(&state.db.pool, &filter).await?;
    Ok(ok(entries))
}

/// Walk the hash chain and report the first broken entry, if any.
pub async fn verify(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<ChainReport>>> {
    let report = repository::audit::verify_chain(&state.db.pool).await?;
    Ok(ok(report))
}
