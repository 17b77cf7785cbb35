//! Notification-channel error types.

use thiserror::Error;

/// Channel provider operation errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The provider reported an internal failure.
    #[error("provider internal error: {0}")]
    Internal(String),

    /// The provider could not be reached or returned no usable response.
    #[error("provider transport error: {0}")]
    Transport(String),

    #[error("channel not found: {0}")]
    NotFound(String),

    /// The provider answered with a non-success response.
    #[error("provider rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl NotifyError {
    /// Whether the error must abort the calling operation.
    ///
    /// Everything else during teardown is logged and treated as already gone.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::Transport(_) | Self::Config(_))
    }
}

/// Result type for channel operations.
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;
