//! Order and order item models
//!
//! An order is the tab for one table. Items carry their own kitchen status;
//! the order-level kitchen progress is derived, never persisted.

use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    InPreparation,
    Ready,
    Paid,
    Cancelled,
    Finalized,
}

impl OrderStatus {
    /// Paid and finalized orders get a close timestamp
    pub fn closes_order(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::Finalized)
    }

    /// Finalized and cancelled orders release their table
    pub fn frees_table(&self) -> bool {
        matches!(self, OrderStatus::Finalized | OrderStatus::Cancelled)
    }
}

/// Per-item preparation stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum KitchenStatus {
    Received,
    InPreparation,
    Ready,
    Delivered,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub waiter_id: i64,
    pub status: OrderStatus,
    /// Derived: recomputed from items after every item mutation
    pub total: f64,
    pub opened_at: i64,
    pub closed_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Captured at add-time, independent of later product price changes
    pub unit_price: f64,
    pub note: Option<String>,
    pub kitchen_status: KitchenStatus,
    /// Set once, on the first transition into in_preparation
    pub started_at: Option<i64>,
    pub created_at: i64,
}

/// Order plus its items, as returned by the detail endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Derived order-level kitchen stage
    pub kitchen_progress: KitchenStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreate {
    pub table_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemCreate {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemUpdate {
    pub quantity: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemStatusUpdate {
    pub kitchen_status: KitchenStatus,
}

/// Query-string filters for the order listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
}

/// Derive the order-level kitchen stage from its items.
///
/// All delivered wins, then all-at-least-ready, then any in preparation;
/// an empty or untouched order reads as received.
pub fn kitchen_progress(items: &[OrderItem]) -> KitchenStatus {
    if items.is_empty() {
        return KitchenStatus::Received;
    }
    if items
        .iter()
        .all(|i| i.kitchen_status == KitchenStatus::Delivered)
    {
        return KitchenStatus::Delivered;
    }
    if items.iter().all(|i| {
        matches!(
            i.kitchen_status,
            KitchenStatus::Ready | KitchenStatus::Delivered
        )
    }) {
        return KitchenStatus::Ready;
    }
    if items
        .iter()
        .any(|i| i.kitchen_status == KitchenStatus::InPreparation)
    {
        return KitchenStatus::InPreparation;
    }
    KitchenStatus::Received
}
