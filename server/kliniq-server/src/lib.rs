//! Kliniq Server - HTTP surface of the Kliniq patient assistant
//!
//! Exposes the chat orchestrator, the voice transcript cache, ad-hoc
//! translation and symptom assessment over a small JSON API. The caller's
//! identity arrives in the `x-patient-id` header set by the gateway.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use error::*;
pub use server::{Components, KliniqServer, ServerConfig};

use axum::{middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes and middleware
pub fn create_app(server: KliniqServer) -> Router {
    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::create_cors_layer())
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
