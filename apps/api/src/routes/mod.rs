pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::document::handlers as document;
use crate::relay::handlers as relay;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Shareable documents (QR-code bridge)
        .route(
            "/api/document",
            post(document::handle_store_document).get(document::handle_fetch_document),
        )
        // LLM relays
        .route("/api/chat", post(relay::handle_chat))
        .route("/api/compare", post(relay::handle_compare))
        .route("/api/prompt/compose", post(relay::handle_compose))
        .with_state(state)
}
