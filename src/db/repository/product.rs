//! Product Repository
//!
//! Read-only: the menu is maintained out of band (migration seed / back
//! office SQL), the API only lists and fetches.

use super::RepoResult;
use crate::db::models::{Product, ProductQuery};
use sqlx::SqlitePool;

const SELECT: &str =
    "SELECT id, name, description, price, available, category_id, created_at FROM products";

pub async fn find_all(pool: &SqlitePool, filter: &ProductQuery) -> RepoResult<Vec<Product>> {
    let mut sql = format!("{SELECT} WHERE 1=1");
    if filter.category_id.is_some() {
        sql.push_str(" AND category_id = ?");
    }
    if filter.available.is_some() {
        sql.push_str(" AND available = ?");
    }
    sql.push_str(" ORDER BY name ASC");

    let mut query = sqlx::query_as::<_, Product>(&sql);
    if let Some(category_id) = filter.category_id {
        query = query.bind(category_id);
    }
    if let Some(available) = filter.available {
        query = query.bind(available);
    }

    let products = query.fetch_all(pool).await?;
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("{SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}
