//! HTTP endpoints served when metrics are exposed for scraping.

mod health_routes;
mod metrics;

use crate::state::AppState;
use axum::Router;

/// Creates the router serving `/metrics` and `/health`.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(metrics::routes())
        .merge(health_routes::routes())
        .with_state(state)
}
