//! Product routes (`/produtos`)
//!
//! Read-only menu access for order taking.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/produtos", get(handler::list))
        .route("/produtos/{id}", get(handler::get_by_id))
}
