//! API routes.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers::{render_reel, render_voice_reel, root, tts};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let files = ServeDir::new(&state.pipeline.config().output_dir);

    Router::new()
        .route("/", get(root))
        .route("/reels/render", post(render_reel))
        .route("/reels/voice", post(render_voice_reel))
        .route("/tts", post(tts))
        .nest_service("/files", files)
        .fallback(|| async { ApiError::not_found("no such route") })
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// CORS policy for `origins`; `*` allows any origin without credentials.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers(Any)
            .allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_DISPOSITION])
        .allow_origin(origins)
}

#[cfg(test)]
#[path = "../tests/unit/routes.rs"]
mod tests;
