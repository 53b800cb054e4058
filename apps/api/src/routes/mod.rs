pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::compose::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/compose", post(handlers::handle_compose))
        .route("/api/v1/layout", post(handlers::handle_layout))
        .route("/api/v1/render", post(handlers::handle_render))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
