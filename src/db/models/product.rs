//! Product model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub available: bool,
    pub category_id: i64,
    pub created_at: i64,
}

/// Query-string filters for the product listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<i64>,
    pub available: Option<bool>,
}
