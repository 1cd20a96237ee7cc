//! Tournament data API with primary/secondary readiness for failover.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod readiness;
pub mod routes;
pub mod state;

pub use state::AppState;

/// Build the full router: JSON API under `/api`, frontend everywhere else.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let frontend = ServeDir::new(&static_dir)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    // CORS configuration for the browser frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/group-matches", get(routes::matches::get_group_matches))
        .route("/standings", get(routes::standings::get_standings))
        .route("/player-stats", get(routes::players::get_player_stats))
        .route("/match", post(routes::matches::create_match))
        .route("/debug", get(routes::debug::debug_info))
        .fallback(routes::api_not_found);

    Router::new()
        .nest("/api", api)
        .fallback_service(frontend)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
