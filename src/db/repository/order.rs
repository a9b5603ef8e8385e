//! Order Repository
//!
//! Owns orders and their items. Every item mutation re-derives the parent
//! order's total from all current rows, so totals self-heal on the next
//! write even if a previous recompute was lost.

use super::{RepoError, RepoResult};
use crate::db::models::{
    ItemCreate, ItemUpdate, KitchenStatus, Order, OrderItem, OrderQuery, OrderStatus,
};
use crate::money;
use crate::utils::now_millis;
use sqlx::SqlitePool;

const SELECT_ORDER: &str =
    "SELECT id, table_id, waiter_id, status, total, opened_at, closed_at FROM orders";

const SELECT_ITEM: &str = "SELECT id, order_id, product_id, quantity, unit_price, note, \
     kitchen_status, started_at, created_at FROM order_items";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("{SELECT_ORDER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

pub async fn find_all(pool: &SqlitePool, filter: &OrderQuery) -> RepoResult<Vec<Order>> {
    let mut sql = format!("{SELECT_ORDER} WHERE 1=1");
    if filter.status.is_some() {
        sql.push_str(" AND status = ?");
    }
    if filter.table_id.is_some() {
        sql.push_str(" AND table_id = ?");
    }
    sql.push_str(" ORDER BY opened_at DESC, id DESC");

    let mut query = sqlx::query_as::<_, Order>(&sql);
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(table_id) = filter.table_id {
        query = query.bind(table_id);
    }

    let orders = query.fetch_all(pool).await?;
    Ok(orders)
}

pub async fn create(pool: &SqlitePool, table_id: i64, waiter_id: i64) -> RepoResult<Order> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (table_id, waiter_id, status, total, opened_at)
         VALUES (?, ?, ?, 0, ?) RETURNING id",
    )
    .bind(table_id)
    .bind(waiter_id)
    .bind(OrderStatus::Open)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Set the order status; paid/finalized also stamp the close timestamp.
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<Order> {
    let rows = if status.closes_order() {
        sqlx::query("UPDATE orders SET status = ?, closed_at = ? WHERE id = ?")
            .bind(status)
            .bind(now_millis())
            .bind(id)
            .execute(pool)
            .await?
    } else {
        sqlx::query("UPDATE orders SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?
    };
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order; items go with it (ON DELETE CASCADE).
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

// ========== Items ==========

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(&format!(
        "{SELECT_ITEM} WHERE order_id = ? ORDER BY created_at ASC, id ASC"
    ))
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn find_item_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderItem>> {
    let item = sqlx::query_as::<_, OrderItem>(&format!("{SELECT_ITEM} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub async fn add_item(pool: &SqlitePool, order_id: i64, data: &ItemCreate) -> RepoResult<OrderItem> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO order_items (order_id, product_id, quantity, unit_price, note, kitchen_status, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(order_id)
    .bind(data.product_id)
    .bind(data.quantity)
    .bind(data.unit_price)
    .bind(&data.note)
    .bind(KitchenStatus::Received)
    .bind(now_millis())
    .fetch_one(pool)
    .await?;

    recompute_total(pool, order_id).await?;

    find_item_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order item".into()))
}

pub async fn update_item(pool: &SqlitePool, id: i64, data: &ItemUpdate) -> RepoResult<OrderItem> {
    let rows = sqlx::query(
        "UPDATE order_items SET quantity = COALESCE(?, quantity), note = COALESCE(?, note)
         WHERE id = ?",
    )
    .bind(data.quantity)
    .bind(&data.note)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order item {id} not found")));
    }

    let item = find_item_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order item {id} not found")))?;
    recompute_total(pool, item.order_id).await?;
    Ok(item)
}

/// Update the kitchen status. The first transition into in_preparation
/// stamps started_at; COALESCE keeps an existing stamp untouched.
pub async fn update_item_status(
    pool: &SqlitePool,
    id: i64,
    status: KitchenStatus,
) -> RepoResult<OrderItem> {
    let rows = if status == KitchenStatus::InPreparation {
        sqlx::query(
            "UPDATE order_items SET kitchen_status = ?, started_at = COALESCE(started_at, ?)
             WHERE id = ?",
        )
        .bind(status)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?
    } else {
        sqlx::query("UPDATE order_items SET kitchen_status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?
    };
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order item {id} not found")));
    }
    find_item_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order item {id} not found")))
}

pub async fn delete_item(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let order_id = sqlx::query_scalar::<_, i64>("SELECT order_id FROM order_items WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(order_id) = order_id else {
        return Ok(false);
    };

    sqlx::query("DELETE FROM order_items WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    recompute_total(pool, order_id).await?;
    Ok(true)
}

/// Re-derive the order total from all current item rows.
pub async fn recompute_total(pool: &SqlitePool, order_id: i64) -> RepoResult<f64> {
    let lines = sqlx::query_as::<_, (i64, f64)>(
        "SELECT quantity, unit_price FROM order_items WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;

    let total = money::order_total(&lines);
    sqlx::query("UPDATE orders SET total = ? WHERE id = ?")
        .bind(total)
        .bind(order_id)
        .execute(pool)
        .await?;
    Ok(total)
}
