//! Audit log types
//!
//! Entries are immutable and never deleted. A SHA-256 hash chain links each
//! entry to its predecessor so after-the-fact edits are detectable.

use serde::{Deserialize, Serialize};

/// Mutating action kinds recorded in the trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    StatusChange,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
            AuditAction::StatusChange => "status_change",
        }
    }
}

/// Entity kinds an entry can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AuditEntity {
    User,
    DiningTable,
    Category,
    Product,
    Order,
    OrderItem,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEntity::User => "user",
            AuditEntity::DiningTable => "dining_table",
            AuditEntity::Category => "category",
            AuditEntity::Product => "product",
            AuditEntity::Order => "order",
            AuditEntity::OrderItem => "order_item",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub entity: AuditEntity,
    pub entity_id: i64,
    pub action: AuditAction,
    /// Acting user; absent for system actions (startup seed)
    pub user_id: Option<i64>,
    /// JSON snapshot of the prior state, when the action destroys it
    pub snapshot: Option<String>,
    pub prev_hash: String,
    pub curr_hash: String,
    pub created_at: i64,
}

/// Query-string filters for the audit listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    pub entity: Option<AuditEntity>,
    pub action: Option<AuditAction>,
    pub limit: Option<i64>,
}

/// Result of walking the hash chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    pub valid: bool,
    pub entries: i64,
    /// First entry whose hash does not match, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_invalid_id: Option<i64>,
}
