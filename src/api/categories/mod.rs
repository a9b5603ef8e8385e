//! Category routes (`/categorias`)

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/categorias", get(handler::list))
}
