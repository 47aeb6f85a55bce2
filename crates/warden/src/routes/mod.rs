//! HTTP route handlers for Warden.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod health;
mod questions;
mod validate;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Gate endpoints
        .route("/questions/{set_id}", get(questions::get_questions))
        .route("/validate", post(validate::validate_answers))
        .route("/access/{slug}", get(validate::access_status))
        // Request tracing
        .layer(TraceLayer::new_for_http())
        // Add shared state
        .with_state(state)
}
