//! Error types for seminar-desk.

use thiserror::Error;

/// Errors that can occur in desk operations.
///
/// Remote failures are not represented here: they are recovered locally and
/// reported through [`crate::Source::Local`] instead.
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("id required")]
    IdRequired,

    #[error("Invalid QR code data: {0}")]
    InvalidQr(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DeskError {
    fn from(e: serde_json::Error) -> Self {
        DeskError::Serialization(e.to_string())
    }
}

/// Result type alias for desk operations.
pub type DeskResult<T> = Result<T, DeskError>;
