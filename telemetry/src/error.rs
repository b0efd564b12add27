use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Exporter error: {0}")]
    ExporterError(String),
}

pub type Result<T> = std::result::Result<T, TelemetryError>;
