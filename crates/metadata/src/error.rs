//! Metadata store error types.

use thiserror::Error;

/// Metadata store operation errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A conditional write found no existing record to overwrite.
    #[error("conditional write failed: {0}")]
    ConditionFailed(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("dynamodb error: {0}")]
    Dynamo(#[from] Box<dyn std::error::Error + Send + Sync>),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("tenant mismatch: table is bound to '{expected}', record belongs to '{actual}'")]
    TenantMismatch { expected: String, actual: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<filestore_core::Error> for MetadataError {
    fn from(e: filestore_core::Error) -> Self {
        MetadataError::Serialization(e.to_string())
    }
}

impl From<std::io::Error> for MetadataError {
    fn from(e: std::io::Error) -> Self {
        MetadataError::Config(e.to_string())
    }
}

/// Result type for metadata operations.
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;
