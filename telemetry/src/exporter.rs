use metrics_exporter_prometheus::PrometheusBuilder;
pub use metrics_exporter_prometheus::PrometheusHandle;

use crate::error::{Result, TelemetryError};

/// Install the global Prometheus recorder and return the handle used to render `/metrics`
pub fn install_prometheus() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| TelemetryError::ExporterError(e.to_string()))?;

    tracing::info!("Prometheus metrics recorder installed");
    Ok(handle)
}
