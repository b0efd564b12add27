pub mod paths;

use axum::{
    routing::{get, post},
    Router,
};

use crate::{
    handlers::{assistant, health, metrics, transcripts, translation, triage},
    server::KliniqServer,
};

/// Health and metrics routes (no caller identity required)
pub fn health_routes() -> Router<KliniqServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::METRICS, get(metrics::render_metrics))
}

/// Patient-facing assistant routes
pub fn assistant_routes() -> Router<KliniqServer> {
    Router::new()
        .route(paths::assistant::CHAT, post(assistant::chat))
        .route(paths::assistant::TRANSCRIPT, post(transcripts::get_transcript))
        .route(paths::assistant::TRANSLATE, post(translation::translate))
        .route(paths::assistant::TRIAGE_ASSESS, post(triage::assess))
}

pub fn create_routes() -> Router<KliniqServer> {
    Router::new()
        .merge(health_routes())
        .nest(paths::API_V1, assistant_routes())
}
