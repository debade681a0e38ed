pub mod health;

use std::path::PathBuf;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::admin;
use crate::engagement;
use crate::entries;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public_dir = PathBuf::from(&state.config.public_dir);

    Router::new()
        .route("/health", get(health::health_handler))
        // Leaderboard
        .route("/api/entries", get(entries::handlers::handle_list_entries))
        // Engagement
        .route("/api/vote", post(engagement::handlers::handle_vote))
        .route("/api/like", post(engagement::handlers::handle_like))
        // Admin (x-admin-token guarded)
        .route("/api/reload", post(admin::handlers::handle_reload))
        .route("/api/review", post(admin::handlers::handle_review))
        // Frontend
        .route_service("/", ServeFile::new(public_dir.join("index.html")))
        .nest_service("/assets", ServeDir::new(public_dir))
        .with_state(state)
}
