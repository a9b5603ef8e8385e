//! Authentication routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /auth/login | POST | public |
//! | /auth/register | POST | public |
//! | /auth/pending-users | GET | admin |
//! | /auth/approve-user/{id} | PATCH | admin |
//! | /auth/reject-user/{id} | DELETE | admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/auth/login", post(handler::login))
        .route("/auth/register", post(handler::register))
        .merge(admin_routes())
}

fn admin_routes() -> Router<ServerState> {
    Router::new()
        .route("/auth/pending-users", get(handler::pending_users))
        .route("/auth/approve-user/{id}", patch(handler::approve_user))
        .route("/auth/reject-user/{id}", delete(handler::reject_user))
        .route_layer(middleware::from_fn(require_admin))
}
