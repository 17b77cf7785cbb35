//! Registry error taxonomy.

use filestore_metadata::MetadataError;
use filestore_notify::NotifyError;
use thiserror::Error;

/// Errors surfaced by registry operations.
///
/// Every variant carries a human-readable detail. The boundary layer maps
/// variants to transport status codes.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Duplicate `(tenant, id)` or a second store of a single-instance class.
    #[error("File Store [{0}] Already Exists")]
    Conflict(String),

    #[error("File store exists with the same name [{0}]")]
    NameConflict(String),

    #[error("FileStore [{0}] Not Found")]
    NotFound(String),

    #[error("Bucket {0} not found")]
    BucketNotFound(String),

    #[error("File Store type [{0}] is not a valid FileClass")]
    InvalidFileClass(String),

    #[error("{0}")]
    PatchError(String),

    #[error("Access denied. Please contact an administrator")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    /// Backend failure not classified above.
    #[error("{0}")]
    Transport(String),
}

impl RegistryError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "file_store_conflict",
            Self::NameConflict(_) => "file_store_name_already_exists",
            Self::NotFound(_) => "file_store_not_found",
            Self::BucketNotFound(_) => "bucket_name_not_found",
            Self::InvalidFileClass(_) => "invalid_file_class",
            Self::PatchError(_) => "file_store_patch_error",
            Self::Forbidden => "forbidden_access",
            Self::Validation(_) => "validation_error",
            Self::Transport(_) => "transport_error",
        }
    }

    /// Short human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Conflict(_) => "File Store Conflict",
            Self::NameConflict(_) => "File Store Name Already Exists",
            Self::NotFound(_) => "File Store Not Found",
            Self::BucketNotFound(_) => "Bucket Name Not Found",
            Self::InvalidFileClass(_) => "Invalid File Class",
            Self::PatchError(_) => "File Store Patch Error",
            Self::Forbidden => "Forbidden Access",
            Self::Validation(_) => "Validation Error",
            Self::Transport(_) => "Transport Error",
        }
    }
}

impl From<MetadataError> for RegistryError {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::AlreadyExists(what) => RegistryError::Conflict(what),
            MetadataError::NotFound(what) => RegistryError::NotFound(what),
            other => RegistryError::Transport(other.to_string()),
        }
    }
}

impl From<NotifyError> for RegistryError {
    fn from(e: NotifyError) -> Self {
        RegistryError::Transport(e.to_string())
    }
}

impl From<filestore_core::Error> for RegistryError {
    fn from(e: filestore_core::Error) -> Self {
        use filestore_core::Error;
        match e {
            Error::InvalidFileClass(class) => RegistryError::InvalidFileClass(class),
            Error::InvalidFileStoreId(id) => RegistryError::NotFound(id),
            Error::Validation(message) => RegistryError::Validation(message),
            Error::InvalidFileFormat(_) => RegistryError::Validation(e.to_string()),
            Error::Serialization(_) => RegistryError::Transport(e.to_string()),
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
