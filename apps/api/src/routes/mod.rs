pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::advice::handlers as advice;
use crate::state::AppState;
use crate::statement::handlers as statement;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/income-ranges", get(advice::handle_income_ranges))
        .route(
            "/api/v1/statements/preview",
            post(statement::handle_preview),
        )
        .route("/api/v1/advice", post(advice::handle_advice))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
