pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::compiler::handlers::handle_compile;
use crate::state::AppState;
use crate::templates::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Template API
        .route("/templates", get(handlers::handle_list_templates))
        .route("/templates/reload", post(handlers::handle_reload_templates))
        .route("/templates/:id", get(handlers::handle_get_template))
        .route("/templates/:id/preview", get(handlers::handle_get_preview))
        // Compile API
        .route("/compile", post(handle_compile))
        .with_state(state)
}
