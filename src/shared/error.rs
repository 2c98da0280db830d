use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Local storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage read failed: {0}")]
    StorageRead(String),

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    #[error("Remote dispatch failed: {0}")]
    RemoteDispatch(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
