//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - login, registration, account approval
//! - [`orders`] - order and item workflow (`/pedidos`)
//! - [`products`] - menu queries (`/produtos`)
//! - [`categories`] - category listing (`/categorias`)
//! - [`audit_logs`] - audit trail listing and chain verification
//!
//! Resource routes keep their original Portuguese names; they are the
//! published contract of this API.

pub mod audit_logs;
pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;

use axum::{Router, middleware};
use socketioxide::SocketIo;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;
use crate::utils::AppError;

/// HTTP request log middleware
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();

    tracing::info!(target: "http_access", "{} {} {} {}ms", method, uri, status, latency_ms);

    response
}

/// Unknown routes answer with the error envelope, not a bare 404.
async fn fallback_404() -> AppError {
    AppError::not_found("Route not found")
}

/// Merge all resource routers (without state or middleware).
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(auth::router())
        .merge(health::router())
        .merge(orders::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(audit_logs::router())
}

/// Assemble the complete service: routes, auth, CORS, compression,
/// request logging, the Socket.IO layer and the 404 fallback.
///
/// The Socket.IO instance is created here and handed to the state's
/// notifier, which starts delivering events from this point on.
pub fn build_router(state: ServerState) -> Router {
    let (socket_layer, io) = SocketIo::new_layer();
    state.notifier.attach(io);

    build_app()
        // Auth runs only for matched routes so unknown paths still 404.
        // require_auth itself skips the public allowlist.
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .fallback(fallback_404)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
        .layer(socket_layer)
}
