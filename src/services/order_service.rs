//! Order Service - the table-to-kitchen workflow
//!
//! Composes the order repository with table handoff, the audit trail and
//! Socket.IO notifications. Database writes come first; notifications are
//! fired after the write succeeds and never fail the request.
//!
//! Table lifecycle: opening an order occupies its table; finalizing,
//! cancelling or deleting the order frees it again.

use sqlx::SqlitePool;
use tracing::warn;

use crate::db::models::{
    AuditAction, AuditEntity, ItemCreate, ItemStatusUpdate, ItemUpdate, Order, OrderCreate,
    OrderItem, OrderQuery, OrderStatusUpdate, OrderWithItems, TableStatus, kitchen_progress,
};
use crate::db::repository;
use crate::message::{self, Notifier};
use crate::money;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    notifier: Notifier,
}

impl OrderService {
    pub fn new(pool: SqlitePool, notifier: Notifier) -> Self {
        Self { pool, notifier }
    }

    /// Open an order for a table. The table must exist; it is marked
    /// occupied as part of the operation.
    pub async fn create_order(&self, waiter_id: i64, data: &OrderCreate) -> AppResult<Order> {
        let table = repository::dining_table::find_by_id(&self.pool, data.table_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Table {} not found", data.table_id)))?;

        let order = repository::order::create(&self.pool, table.id, waiter_id).await?;
        repository::dining_table::update_status(&self.pool, table.id, TableStatus::Occupied)
            .await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::Order,
            order.id,
            AuditAction::Create,
            Some(waiter_id),
            None,
        )
        .await?;

        self.notifier.emit(message::ORDER_CREATED, &order).await;
        Ok(order)
    }

    /// Orders, newest first, optionally filtered by status and table.
    pub async fn list_orders(&self, filter: &OrderQuery) -> AppResult<Vec<Order>> {
        let orders = repository::order::find_all(&self.pool, filter).await?;
        Ok(orders)
    }

    /// One order with its items and the derived kitchen stage.
    pub async fn get_order(&self, id: i64) -> AppResult<OrderWithItems> {
        let order = repository::order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        let items = repository::order::find_items(&self.pool, id).await?;
        let kitchen_progress = kitchen_progress(&items);

        Ok(OrderWithItems {
            order,
            items,
            kitchen_progress,
        })
    }

    /// Move an order through its lifecycle. Paid and finalized stamp the
    /// close timestamp; finalized and cancelled free the table.
    pub async fn update_order_status(
        &self,
        user_id: i64,
        id: i64,
        data: &OrderStatusUpdate,
    ) -> AppResult<Order> {
        let existing = repository::order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        let snapshot = snapshot_json(&existing)?;

        let order = repository::order::update_status(&self.pool, id, data.status).await?;
        if data.status.frees_table() {
            self.free_table(order.table_id).await;
        }

        repository::audit::append(
            &self.pool,
            AuditEntity::Order,
            id,
            AuditAction::StatusChange,
            Some(user_id),
            Some(snapshot),
        )
        .await?;

        self.notifier.emit(message::ORDER_STATUS_CHANGED, &order).await;
        Ok(order)
    }

    /// Delete an order and everything on it. The table is freed.
    pub async fn delete_order(&self, user_id: i64, id: i64) -> AppResult<()> {
        let order = repository::order::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
        let snapshot = snapshot_json(&order)?;

        repository::order::delete(&self.pool, id).await?;
        self.free_table(order.table_id).await;

        repository::audit::append(
            &self.pool,
            AuditEntity::Order,
            id,
            AuditAction::Delete,
            Some(user_id),
            Some(snapshot),
        )
        .await?;

        Ok(())
    }

    // ========== Items ==========

    /// Add an item to an order. The parent total is re-derived in the
    /// same call.
    pub async fn add_item(
        &self,
        user_id: i64,
        order_id: i64,
        data: &ItemCreate,
    ) -> AppResult<OrderItem> {
        repository::order::find_by_id(&self.pool, order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {order_id} not found")))?;
        repository::product::find_by_id(&self.pool, data.product_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Product {} not found", data.product_id))
            })?;

        money::validate_quantity(data.quantity)?;
        money::validate_unit_price(data.unit_price)?;
        validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;

        let item = repository::order::add_item(&self.pool, order_id, data).await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::OrderItem,
            item.id,
            AuditAction::Create,
            Some(user_id),
            None,
        )
        .await?;

        Ok(item)
    }

    /// Change quantity or note. The parent total is re-derived.
    pub async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        data: &ItemUpdate,
    ) -> AppResult<OrderItem> {
        let existing = repository::order::find_item_by_id(&self.pool, item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order item {item_id} not found")))?;
        let snapshot = snapshot_json(&existing)?;

        if let Some(quantity) = data.quantity {
            money::validate_quantity(quantity)?;
        }
        validate_optional_text(&data.note, "note", MAX_NOTE_LEN)?;

        let item = repository::order::update_item(&self.pool, item_id, data).await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::OrderItem,
            item_id,
            AuditAction::Update,
            Some(user_id),
            Some(snapshot),
        )
        .await?;

        Ok(item)
    }

    /// Walk an item through the kitchen pipeline. The first transition
    /// into in_preparation stamps its start time.
    pub async fn update_item_status(
        &self,
        user_id: i64,
        item_id: i64,
        data: &ItemStatusUpdate,
    ) -> AppResult<OrderItem> {
        let existing = repository::order::find_item_by_id(&self.pool, item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order item {item_id} not found")))?;
        let snapshot = snapshot_json(&existing)?;

        let item =
            repository::order::update_item_status(&self.pool, item_id, data.kitchen_status)
                .await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::OrderItem,
            item_id,
            AuditAction::StatusChange,
            Some(user_id),
            Some(snapshot),
        )
        .await?;

        self.notifier.emit(message::ITEM_STATUS_CHANGED, &item).await;
        Ok(item)
    }

    /// Remove an item. The parent total is re-derived.
    pub async fn delete_item(&self, user_id: i64, item_id: i64) -> AppResult<()> {
        let item = repository::order::find_item_by_id(&self.pool, item_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order item {item_id} not found")))?;
        let snapshot = snapshot_json(&item)?;

        repository::order::delete_item(&self.pool, item_id).await?;

        repository::audit::append(
            &self.pool,
            AuditEntity::OrderItem,
            item_id,
            AuditAction::Delete,
            Some(user_id),
            Some(snapshot),
        )
        .await?;

        Ok(())
    }

    /// Freeing a table that was deleted underneath its order is not worth
    /// failing the request over.
    async fn free_table(&self, table_id: i64) {
        if let Err(e) =
            repository::dining_table::update_status(&self.pool, table_id, TableStatus::Free).await
        {
            warn!(table_id, error = %e, "Failed to free table");
        }
    }
}

fn snapshot_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AppError::internal(format!("Snapshot serialization failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{AuditQuery, KitchenStatus, OrderStatus};

    async fn service() -> (OrderService, i64) {
        let db = DbService::new_in_memory().await.unwrap();
        let waiter_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (name, email, password_hash, role, status, created_at)
             VALUES ('Ana', 'ana@test.local', 'x', 'waiter', 'active', 0) RETURNING id",
        )
        .fetch_one(&db.pool)
        .await
        .unwrap();
        (OrderService::new(db.pool, Notifier::new()), waiter_id)
    }

    fn item(product_id: i64, quantity: i64, unit_price: f64) -> ItemCreate {
        ItemCreate {
            product_id,
            quantity,
            unit_price,
            note: None,
        }
    }

    async fn table_status(svc: &OrderService, table_id: i64) -> TableStatus {
        repository::dining_table::find_by_id(&svc.pool, table_id)
            .await
            .unwrap()
            .unwrap()
            .status
    }

    #[tokio::test]
    async fn creating_an_order_occupies_the_table() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 1 })
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Open);
        assert_eq!(order.total, 0.0);
        assert_eq!(table_status(&svc, 1).await, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn missing_table_fails_without_writing() {
        let (svc, waiter) = service().await;
        let err = svc
            .create_order(waiter, &OrderCreate { table_id: 999 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        assert!(svc.list_orders(&OrderQuery::default()).await.unwrap().is_empty());
        let audited = repository::audit::find_all(&svc.pool, &AuditQuery::default())
            .await
            .unwrap();
        assert!(audited.is_empty());
    }

    #[tokio::test]
    async fn detail_carries_items_and_derived_progress() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 2 })
            .await
            .unwrap();
        let first = svc.add_item(waiter, order.id, &item(1, 2, 15.50)).await.unwrap();
        svc.add_item(waiter, order.id, &item(5, 1, 9.00)).await.unwrap();

        svc.update_item_status(
            waiter,
            first.id,
            &ItemStatusUpdate {
                kitchen_status: KitchenStatus::InPreparation,
            },
        )
        .await
        .unwrap();

        let detail = svc.get_order(order.id).await.unwrap();
        assert_eq!(detail.order.total, 40.00);
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.kitchen_progress, KitchenStatus::InPreparation);
    }

    #[tokio::test]
    async fn finalizing_frees_the_table_and_stamps_the_close() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 3 })
            .await
            .unwrap();
        assert_eq!(table_status(&svc, 3).await, TableStatus::Occupied);

        let order = svc
            .update_order_status(
                waiter,
                order.id,
                &OrderStatusUpdate {
                    status: OrderStatus::Finalized,
                },
            )
            .await
            .unwrap();
        assert!(order.closed_at.is_some());
        assert_eq!(table_status(&svc, 3).await, TableStatus::Free);

        let audited = repository::audit::find_all(
            &svc.pool,
            &AuditQuery {
                entity: Some(AuditEntity::Order),
                action: Some(AuditAction::StatusChange),
                limit: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(audited.len(), 1);
        assert!(audited[0].snapshot.as_deref().unwrap().contains("\"status\":\"open\""));
    }

    #[tokio::test]
    async fn paid_keeps_the_table_occupied() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 4 })
            .await
            .unwrap();
        let order = svc
            .update_order_status(
                waiter,
                order.id,
                &OrderStatusUpdate {
                    status: OrderStatus::Paid,
                },
            )
            .await
            .unwrap();
        assert!(order.closed_at.is_some());
        assert_eq!(table_status(&svc, 4).await, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn deleting_an_order_frees_the_table_with_a_snapshot() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 5 })
            .await
            .unwrap();
        svc.add_item(waiter, order.id, &item(2, 1, 22.0)).await.unwrap();

        svc.delete_order(waiter, order.id).await.unwrap();
        assert_eq!(table_status(&svc, 5).await, TableStatus::Free);
        assert!(matches!(
            svc.get_order(order.id).await.unwrap_err(),
            AppError::NotFound(_)
        ));

        let audited = repository::audit::find_all(
            &svc.pool,
            &AuditQuery {
                entity: Some(AuditEntity::Order),
                action: Some(AuditAction::Delete),
                limit: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(audited.len(), 1);
    }

    #[tokio::test]
    async fn item_for_unknown_product_is_rejected() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 6 })
            .await
            .unwrap();
        let err = svc
            .add_item(waiter, order.id, &item(9999, 1, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(svc.get_order(order.id).await.unwrap().items.len(), 0);
    }

    #[tokio::test]
    async fn bad_quantity_is_rejected() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 7 })
            .await
            .unwrap();
        let err = svc
            .add_item(waiter, order.id, &item(1, 0, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn deleting_an_item_reprices_the_order() {
        let (svc, waiter) = service().await;
        let order = svc
            .create_order(waiter, &OrderCreate { table_id: 8 })
            .await
            .unwrap();
        let keep = svc.add_item(waiter, order.id, &item(1, 1, 15.50)).await.unwrap();
        let removed = svc.add_item(waiter, order.id, &item(5, 2, 9.00)).await.unwrap();
        assert_eq!(svc.get_order(order.id).await.unwrap().order.total, 33.50);

        svc.delete_item(waiter, removed.id).await.unwrap();
        let detail = svc.get_order(order.id).await.unwrap();
        assert_eq!(detail.order.total, 15.50);
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].id, keep.id);
    }
}
