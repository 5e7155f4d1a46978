pub mod error;
pub mod routes;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit, routing::{get, post}};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Headroom for the reference text and multipart framing on top of the audio.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    let analyze_routes = Router::new()
        .route("/analyze", post(routes::analyze::analyze))
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .merge(analyze_routes)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
