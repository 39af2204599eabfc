//! Application-wide error types.
//!
//! Every module error in the engine converts into [`AppError`], which is
//! what a calling UI inspects to decide how to report a failure.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing required document fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation attempted from a status that does not allow it.
    #[error("Invalid state '{status}': {message}")]
    InvalidState {
        /// The offending status string, as stored.
        status: String,
        /// What was attempted.
        message: String,
    },

    /// Requested record absent from every source.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistent store failed or returned corrupt data.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Rendering or export failed at the dispatch boundary.
    #[error("Export failed: {0}")]
    Export(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code reported to the calling UI.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Export(_) => "EXPORT_FAILED",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true for failures the caller can fix by changing its input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidState { .. } | Self::NotFound(_)
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::InvalidState {
                status: "draft".into(),
                message: String::new(),
            }
            .error_code(),
            "INVALID_STATE"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Storage(String::new()).error_code(),
            "STORAGE_ERROR"
        );
        assert_eq!(AppError::Export(String::new()).error_code(), "EXPORT_FAILED");
        assert_eq!(
            AppError::Configuration(String::new()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::InvalidState {
                status: " Draft ".into(),
                message: "cannot convert quote to sales_order".into(),
            }
            .to_string(),
            "Invalid state ' Draft ': cannot convert quote to sales_order"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(AppError::Validation(String::new()).is_client_error());
        assert!(AppError::NotFound(String::new()).is_client_error());
        assert!(!AppError::Storage(String::new()).is_client_error());
        assert!(!AppError::Export(String::new()).is_client_error());
    }
}
