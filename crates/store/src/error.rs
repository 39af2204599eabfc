//! Store error types.

use thiserror::Error;

use docket_core::document::{DocumentType, ValidationError};
use docket_core::workflow::WorkflowError;
use docket_shared::AppError;

use crate::kv::KvError;

/// Errors from stateful operations: saves, deletes, conversions and
/// counter administration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend failed a write.
    #[error(transparent)]
    Kv(#[from] KvError),

    /// The document is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A workflow rule refused the operation.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The record does not exist.
    #[error("{document_type} {id} not found")]
    NotFound {
        /// The requested type.
        document_type: DocumentType,
        /// The requested id.
        id: String,
    },

    /// The record is a default and cannot be deleted.
    #[error("Customization '{0}' is a default and cannot be deleted")]
    Protected(String),
}

impl StoreError {
    /// Returns the error code for the calling UI.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Kv(err) => err.error_code(),
            Self::Validation(err) => err.error_code(),
            Self::Workflow(err) => err.error_code(),
            Self::NotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::Protected(_) => "PROTECTED_RECORD",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Kv(err) => err.into(),
            StoreError::Validation(err) => err.into(),
            StoreError::Workflow(err) => err.into(),
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Protected(_) => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_pass_through() {
        let err = StoreError::from(ValidationError::MissingField("documentNumber"));
        assert_eq!(err.error_code(), "MISSING_FIELD");

        let err = StoreError::from(WorkflowError::NotFound {
            document_type: DocumentType::Quote,
            id: "q-1".to_string(),
        });
        assert_eq!(err.error_code(), "DOCUMENT_NOT_FOUND");
    }

    #[test]
    fn test_maps_into_app_error() {
        let err: AppError = StoreError::NotFound {
            document_type: DocumentType::Invoice,
            id: "inv-1".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = StoreError::Protected("default-invoice".to_string()).into();
        assert!(err.is_client_error());

        let err: AppError = StoreError::Kv(KvError::Io {
            key: "documents.invoice".to_string(),
            source: std::io::Error::other("disk"),
        })
        .into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
