//! Dining table model
//!
//! Tables are seeded by migration and mutated only by the order lifecycle:
//! occupied on order creation, freed when the order closes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TableStatus {
    Free,
    Occupied,
    Reserved,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DiningTable {
    pub id: i64,
    pub number: i64,
    pub capacity: i64,
    pub status: TableStatus,
    pub created_at: i64,
}
