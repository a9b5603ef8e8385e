//! Order routes (`/pedidos`)
//!
//! | Path | Method | Operation |
//! |------|--------|-----------|
//! | /pedidos | GET | list (status, table_id filters) |
//! | /pedidos | POST | open an order |
//! | /pedidos/{id} | GET | detail with items |
//! | /pedidos/{id}/status | PATCH | lifecycle transition |
//! | /pedidos/{id} | DELETE | delete order and items |
//! | /pedidos/{id}/itens | POST | add item |
//! | /pedidos/itens/{id} | PATCH | change quantity or note |
//! | /pedidos/itens/{id}/status | PATCH | kitchen transition |
//! | /pedidos/itens/{id} | DELETE | remove item |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/pedidos", get(handler::list).post(handler::create))
        .route(
            "/pedidos/{id}",
            get(handler::get_by_id).delete(handler::delete_order),
        )
        .route("/pedidos/{id}/status", patch(handler::update_status))
        .route("/pedidos/{id}/itens", post(handler::add_item))
        .route(
            "/pedidos/itens/{id}",
            patch(handler::update_item).delete(handler::delete_item),
        )
        .route(
            "/pedidos/itens/{id}/status",
            patch(handler::update_item_status),
        )
}
