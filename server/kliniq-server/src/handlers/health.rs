use axum::{extract::State, response::Json};
use serde::Serialize;
use std::collections::HashMap;

use crate::server::KliniqServer;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime: u64,
    pub checks: HashMap<String, String>,
}

/// Health check handler
pub async fn health_check(State(server): State<KliniqServer>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    let store_healthy = server.chat_store.is_healthy().await;
    checks.insert(
        "store".to_string(),
        format!("{} ({})", if store_healthy { "healthy" } else { "unhealthy" }, server.config.storage),
    );
    checks.insert(
        "inference".to_string(),
        if server.config.inference_configured {
            "configured"
        } else {
            "not_configured"
        }
        .to_string(),
    );
    checks.insert("speech".to_string(), server.config.speech_provider.clone());

    let status = if store_healthy && server.config.inference_configured {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.started_at.elapsed().as_secs(),
        checks,
    })
}
