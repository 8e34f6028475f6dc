//! Application setup and server configuration.

use axum::{extract::Extension, routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::server::routes::{
    current_element_sets_handler, element_set_by_catalog_number_handler,
    element_set_by_name_handler, health_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
}

/// Build the Axum application router
///
/// Read-only: ingestion runs in the scheduler, never from a request.
pub fn build_app(pool: PgPool) -> Router {
    let app_state = AppState { db_pool: pool };

    Router::new()
        .route("/health", get(health_handler))
        .route("/element-sets", get(current_element_sets_handler))
        .route(
            "/element-sets/by-name/:name",
            get(element_set_by_name_handler),
        )
        .route(
            "/element-sets/:catalog_number",
            get(element_set_by_catalog_number_handler),
        )
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
}
