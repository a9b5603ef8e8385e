//! Comanda - restaurant order management backend
//!
//! Waitstaff open orders against tables, add menu items, the kitchen walks
//! each item through its preparation pipeline, totals and an append-only
//! audit trail are maintained, and connected clients get best-effort change
//! notifications over Socket.IO.
//!
//! # Module structure
//!
//! ```text
//! src/
//! ├── core/      # Config, state, server
//! ├── auth/      # JWT, extractor, route guards
//! ├── db/        # SQLite pool, models, repositories
//! ├── services/  # Order, auth and catalog orchestration
//! ├── api/       # HTTP routes and handlers
//! ├── message/   # Socket.IO notifier
//! ├── money/     # Decimal-backed money arithmetic
//! └── utils/     # Errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod message;
pub mod money;
pub mod services;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::Notifier;
pub use utils::{AppError, AppResponse, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events under the "security" target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load `.env` and initialize logging. Call once, before anything else.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("RUST_LOG").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
   ______                                __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
