//! Audit Repository
//!
//! Append-only trail with a SHA-256 hash chain. Each entry's hash covers
//! its own stored fields plus the previous entry's hash; the first entry
//! chains off the literal "genesis". Verification replays the chain in
//! insertion order and reports the first entry that no longer matches.

use super::{RepoError, RepoResult};
use crate::db::models::{AuditAction, AuditEntity, AuditEntry, AuditQuery, ChainReport};
use crate::utils::now_millis;
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

const GENESIS: &str = "genesis";

const SELECT: &str = "SELECT id, entity, entity_id, action, user_id, snapshot, prev_hash, \
     curr_hash, created_at FROM audit_log";

/// Hash of one entry, bound to its predecessor.
///
/// Variable-length strings are NUL-terminated and optional fields carry a
/// presence tag byte, so no two distinct field layouts share an input.
fn chain_hash(
    prev_hash: &str,
    entity: AuditEntity,
    entity_id: i64,
    action: AuditAction,
    user_id: Option<i64>,
    snapshot: Option<&str>,
    created_at: i64,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash.as_bytes());
    hasher.update([0u8]);
    hasher.update(entity.as_str().as_bytes());
    hasher.update([0u8]);
    hasher.update(entity_id.to_le_bytes());
    hasher.update(action.as_str().as_bytes());
    hasher.update([0u8]);
    match user_id {
        None => hasher.update([0u8]),
        Some(id) => {
            hasher.update([1u8]);
            hasher.update(id.to_le_bytes());
        }
    }
    match snapshot {
        None => hasher.update([0u8]),
        Some(s) => {
            hasher.update([1u8]);
            hasher.update(s.as_bytes());
        }
    }
    hasher.update(created_at.to_le_bytes());
    hex::encode(hasher.finalize())
}

async fn last_hash(pool: &SqlitePool) -> RepoResult<String> {
    let hash =
        sqlx::query_scalar::<_, String>("SELECT curr_hash FROM audit_log ORDER BY id DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;
    Ok(hash.unwrap_or_else(|| GENESIS.to_string()))
}

pub async fn append(
    pool: &SqlitePool,
    entity: AuditEntity,
    entity_id: i64,
    action: AuditAction,
    user_id: Option<i64>,
    snapshot: Option<String>,
) -> RepoResult<AuditEntry> {
    let prev_hash = last_hash(pool).await?;
    let created_at = now_millis();
    let curr_hash = chain_hash(
        &prev_hash,
        entity,
        entity_id,
        action,
        user_id,
        snapshot.as_deref(),
        created_at,
    );

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO audit_log (entity, entity_id, action, user_id, snapshot, prev_hash, curr_hash, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(entity)
    .bind(entity_id)
    .bind(action)
    .bind(user_id)
    .bind(&snapshot)
    .bind(&prev_hash)
    .bind(&curr_hash)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    let entry = sqlx::query_as::<_, AuditEntry>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    entry.ok_or_else(|| RepoError::Database("Failed to record audit entry".into()))
}

/// Newest entries first; the limit defaults to 100 and caps at 1000.
pub async fn find_all(pool: &SqlitePool, filter: &AuditQuery) -> RepoResult<Vec<AuditEntry>> {
    let mut sql = format!("{SELECT} WHERE 1=1");
    if filter.entity.is_some() {
        sql.push_str(" AND entity = ?");
    }
    if filter.action.is_some() {
        sql.push_str(" AND action = ?");
    }
    sql.push_str(" ORDER BY id DESC LIMIT ?");

    let limit = filter.limit.unwrap_or(100).clamp(1, 1000);
    let mut query = sqlx::query_as::<_, AuditEntry>(&sql);
    if let Some(entity) = filter.entity {
        query = query.bind(entity);
    }
    if let Some(action) = filter.action {
        query = query.bind(action);
    }

    let entries = query.bind(limit).fetch_all(pool).await?;
    Ok(entries)
}

/// Replay every entry in insertion order and check both links: the stored
/// prev_hash must equal the predecessor's curr_hash, and the recomputed
/// hash must equal the stored curr_hash.
pub async fn verify_chain(pool: &SqlitePool) -> RepoResult<ChainReport> {
    let entries = sqlx::query_as::<_, AuditEntry>(&format!("{SELECT} ORDER BY id ASC"))
        .fetch_all(pool)
        .await?;

    let mut expected_prev = GENESIS.to_string();
    for entry in &entries {
        let recomputed = chain_hash(
            &entry.prev_hash,
            entry.entity,
            entry.entity_id,
            entry.action,
            entry.user_id,
            entry.snapshot.as_deref(),
            entry.created_at,
        );
        if entry.prev_hash != expected_prev || entry.curr_hash != recomputed {
            return Ok(ChainReport {
                valid: false,
                entries: entries.len() as i64,
                first_invalid_id: Some(entry.id),
            });
        }
        expected_prev = entry.curr_hash.clone();
    }

    Ok(ChainReport {
        valid: true,
        entries: entries.len() as i64,
        first_invalid_id: None,
    })
}
