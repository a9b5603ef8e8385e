//! Audit trail routes (`/audit-logs`)
//!
//! Admin-only. Listing supports entity/action filters; verification
//! replays the whole hash chain.

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/audit-logs", get(handler::list))
        .route("/audit-logs/verify", get(handler::verify))
        .route_layer(middleware::from_fn(require_admin))
}
