pub mod generate;
pub mod health;
pub mod index;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/generate", post(generate::generate_handler))
        .route("/health", get(health::health_handler))
        .with_state(state)
}
