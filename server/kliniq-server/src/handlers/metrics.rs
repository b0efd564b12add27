use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::server::KliniqServer;

/// Prometheus text exposition, when a recorder is installed
pub async fn render_metrics(State(server): State<KliniqServer>) -> Response {
    match &server.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
