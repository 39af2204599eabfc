//! Key-value store errors.

use thiserror::Error;

use docket_shared::AppError;

/// Errors raised by a key-value backend.
#[derive(Debug, Error)]
pub enum KvError {
    /// The backend could not read or write a key.
    #[error("I/O error on key '{key}': {source}")]
    Io {
        /// The key being accessed.
        key: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A value could not be serialized for writing.
    #[error("Failed to serialize key '{key}': {source}")]
    Serialize {
        /// The key being written.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
}

impl KvError {
    /// Returns the error code for the calling UI.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "STORAGE_IO",
            Self::Serialize { .. } => "STORAGE_SERIALIZE",
        }
    }
}

impl From<KvError> for AppError {
    fn from(err: KvError) -> Self {
        Self::Storage(err.to_string())
    }
}
