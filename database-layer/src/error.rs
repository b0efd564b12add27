use error_common::KliniqError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl From<DatabaseError> for KliniqError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConfigError(msg) => KliniqError::ConfigError(msg),
            other => KliniqError::PersistenceError(other.to_string()),
        }
    }
}
