//! Dining Table Repository
//!
//! Tables have no CRUD API; the order lifecycle flips their status.

use super::{RepoError, RepoResult};
use crate::db::models::{DiningTable, TableStatus};
use sqlx::SqlitePool;

const SELECT: &str = "SELECT id, number, capacity, status, created_at FROM dining_tables";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DiningTable>> {
    let table = sqlx::query_as::<_, DiningTable>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(table)
}

pub async fn update_status(pool: &SqlitePool, id: i64, status: TableStatus) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE dining_tables SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id} not found")));
    }
    Ok(())
}
