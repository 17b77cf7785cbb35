//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("File Store type [{0}] is not a valid FileClass")]
    InvalidFileClass(String),

    #[error("invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("invalid file store ID: {0}")]
    InvalidFileStoreId(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
