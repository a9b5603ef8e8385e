use std::sync::Arc;

use crate::auth::JwtService;
use crate::core::Config;
use crate::core::error::{Result, ServerError};
use crate::db::DbService;
use crate::message::Notifier;
use crate::services::{AuthService, CatalogService, OrderService};

/// Shared application state, cloned into every handler.
///
/// All fields are cheap to clone: services hold a pool handle, the JWT
/// service is behind an `Arc`, the notifier is a shared Socket.IO slot.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | SQLite pool owner |
/// | jwt_service | token issue and verification |
/// | notifier | Socket.IO broadcast handle |
/// | auth | login, registration, account approval |
/// | orders | order and item workflow |
/// | catalog | read-only products and categories |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub notifier: Notifier,
    pub auth: AuthService,
    pub orders: OrderService,
    pub catalog: CatalogService,
}

impl ServerState {
    /// Initialize the full service graph.
    ///
    /// Opens the database (creating file and parents if needed), applies
    /// migrations, wires the services and seeds the admin account. Fails
    /// fast on an unusable database or a short production JWT secret.
    pub async fn initialize(config: &Config) -> Result<Self> {
        if config.is_production() && config.jwt.secret.len() < 32 {
            return Err(ServerError::Config(
                "JWT_SECRET must be at least 32 characters in production".into(),
            ));
        }

        let db = DbService::new(&config.database_path).await?;
        let state = Self::with_db(config.clone(), db);

        state
            .auth
            .seed_admin(&config.admin_email, &config.admin_password)
            .await?;

        Ok(state)
    }

    /// Wire the services over an existing database handle.
    ///
    /// Integration tests use this with an in-memory database.
    pub fn with_db(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let notifier = Notifier::new();
        let auth = AuthService::new(db.pool.clone(), jwt_service.clone());
        let orders = OrderService::new(db.pool.clone(), notifier.clone());
        let catalog = CatalogService::new(db.pool.clone());

        Self {
            config,
            db,
            jwt_service,
            notifier,
            auth,
            orders,
            catalog,
        }
    }

    /// Release held resources. Called once on graceful shutdown.
    pub async fn shutdown(&self) {
        self.db.close().await;
    }
}
