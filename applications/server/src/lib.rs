//! Tilawa Server Library
//!
//! HTTP API for verse text and natural-language range parsing, fronting
//! alquran.cloud and OpenAI.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError, RATE_LIMIT_MESSAGE};
pub use middleware::RateLimiter;
pub use state::AppState;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the application router
pub fn create_router(app_state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(api::health::health))
        .route("/verse/:surah/:ayah", get(api::verse::get_verse))
        .route("/ayah/:surah/:ayah", get(api::verse::get_verse))
        .route("/audio/:surah/:ayah", get(api::audio::audio_url));

    // Rate limit covers range parsing only
    let limited_routes = Router::new()
        .route("/parse-range", post(api::range::parse_range))
        .layer(axum_middleware::from_fn_with_state(
            Arc::clone(&app_state.rate_limiter),
            middleware::rate_limit_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(limited_routes))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
