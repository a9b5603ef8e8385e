//! User Repository

use super::{RepoError, RepoResult};
use crate::db::models::{AccountStatus, User, UserCreate};
use crate::utils::now_millis;
use sqlx::SqlitePool;

const SELECT: &str =
    "SELECT id, name, email, password_hash, role, status, created_at FROM users";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{SELECT} WHERE email = ? LIMIT 1"))
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_status(pool: &SqlitePool, status: AccountStatus) -> RepoResult<Vec<User>> {
    let users =
        sqlx::query_as::<_, User>(&format!("{SELECT} WHERE status = ? ORDER BY created_at ASC"))
            .bind(status)
            .fetch_all(pool)
            .await?;
    Ok(users)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (name, email, password_hash, role, status, created_at)
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.password_hash)
    .bind(data.role)
    .bind(data.status)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: AccountStatus,
) -> RepoResult<User> {
    let rows = sqlx::query("UPDATE users SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
