//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use picstash_core::Config;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // The request body cap sits above the per-file limit so oversized uploads
    // are rejected by the size validator (413) rather than cut off mid-parse.
    let body_limit = config.max_upload_bytes * 2;

    Router::new()
        .route("/photos", post(handlers::photo_upload::upload_photo))
        .route("/photos/{id}", get(handlers::photo_get::get_photo))
        .route(
            "/photos/{id}/content",
            get(handlers::photo_get::get_photo_content),
        )
        .route("/health", get(handlers::health::health))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
