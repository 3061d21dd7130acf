pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::{handle_analyze, handle_tailor};
use crate::cover_letter::handlers::handle_cover_letter;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analyze", post(handle_analyze))
        // Cover Letter API
        .route("/api/v1/cover-letter", post(handle_cover_letter))
        // Both in one call
        .route("/api/v1/tailor", post(handle_tailor))
        .with_state(state)
}
