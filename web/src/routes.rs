//! Router configuration.

use crate::handlers::{health_check, list_items, purchase};
use crate::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// The rate-limit layer wraps only the purchase route: catalog listings
/// and health checks are read-only and unguarded.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let purchase_routes = Router::new()
        .route("/purchase/:id", post(purchase))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    Router::new()
        .route("/health", get(health_check))
        .route("/items", get(list_items))
        .merge(purchase_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
