//! HTTP surface: routing, payloads, and error mapping.

pub mod error;
pub mod handlers;

use crate::state::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub fn build_router(state: AppState, cors: bool) -> Router {
    let router = Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/habits", post(handlers::create_habit_handler))
        .route("/day", get(handlers::day_handler))
        .route("/habits/:id/toggle", patch(handlers::toggle_habit_handler))
        .route("/summary", get(handlers::summary_handler))
        .fallback(handlers::not_found_handler)
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
