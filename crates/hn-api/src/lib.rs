//! # hn-api
//!
//! The HTTP surface over hn-core. Handlers only decode, delegate to the
//! [`Engine`](hn_core::Engine) and serialize; all validation lives in the core.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

pub use handlers::AppState;

/// Builds the service router.
///
/// # Developer Note
/// Returned without a listener so the binary and tests can mount it the same way.
pub fn configure_routes(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/parse", post(handlers::parse))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::cors_policy())
        .layer(middleware::standard_middleware())
        .with_state(state)
}
