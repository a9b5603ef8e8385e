//! Catalog Service - read-only menu queries
//!
//! The menu is managed out of band (seeded migrations, back office
//! tooling). This service only reads: products filtered by category and
//! availability, and the category list, both in name order.

use sqlx::SqlitePool;

use crate::db::models::{Category, Product, ProductQuery};
use crate::db::repository;
use crate::utils::{AppError, AppResult};

#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_products(&self, filter: &ProductQuery) -> AppResult<Vec<Product>> {
        let products = repository::product::find_all(&self.pool, filter).await?;
        Ok(products)
    }

    pub async fn get_product(&self, id: i64) -> AppResult<Product> {
        repository::product::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories = repository::category::find_all(&self.pool).await?;
        Ok(categories)
    }
}
