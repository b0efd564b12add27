use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, warn};

use error_common::{log_error, KliniqError, Result};
use kliniq_server::{create_app, KliniqServer};
use logger_redacted::{init_tracing, redactor_for, LoggerConfig};

/// Kliniq assistant HTTP server
#[derive(Parser, Debug)]
#[command(name = "kliniq-server")]
#[command(about = "Patient assistant API: chat, voice transcripts, translation and triage")]
struct Args {
    /// Server bind address
    #[arg(long, env = "KLINIQ_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, env = "KLINIQ_PORT", default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Run database migrations on startup
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut logger_config = LoggerConfig::from_env();
    if args.verbose {
        logger_config = logger_config.verbose();
    }
    init_tracing(&logger_config).map_err(|e| KliniqError::ConfigError(e.to_string()))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Kliniq assistant server");

    let metrics = match telemetry::install_prometheus() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    let mut server = match KliniqServer::from_env(redactor_for(&logger_config), args.migrate).await {
        Ok(server) => server,
        Err(e) => {
            log_error("startup", &e).await;
            return Err(e);
        }
    };
    if let Some(handle) = metrics {
        server = server.with_metrics(handle);
    }
    info!(
        storage = server.config.storage,
        speech = %server.config.speech_provider,
        inference_configured = server.config.inference_configured,
        "Server components ready"
    );

    let app = create_app(server);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| KliniqError::ConfigError(format!("Invalid bind address: {e}")))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| KliniqError::NetworkError(format!("Failed to bind to {addr}: {e}")))?;

    info!(%addr, "Kliniq server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| KliniqError::ServerError(format!("HTTP server error: {e}")))?;

    Ok(())
}
