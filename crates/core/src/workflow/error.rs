//! Workflow error types for document lifecycle management.

use thiserror::Error;

use docket_shared::AppError;

use crate::document::DocumentType;

/// Errors that can occur during workflow operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// The document's current status does not allow the operation.
    #[error("Cannot {attempted}: {document_type} is in status '{status}'")]
    InvalidState {
        /// The document's type.
        document_type: DocumentType,
        /// The raw status string, as stored.
        status: String,
        /// What was attempted.
        attempted: String,
    },

    /// No conversion exists between the two types.
    #[error("Conversion from {from} to {to} is not supported")]
    UnsupportedConversion {
        /// Source type.
        from: DocumentType,
        /// Requested target type.
        to: DocumentType,
    },

    /// The action name is not defined for the type.
    #[error("Unknown action '{action}' for {document_type}")]
    UnknownAction {
        /// The document's type.
        document_type: DocumentType,
        /// The requested action.
        action: String,
    },

    /// The document was found in neither the local store nor the remote source.
    #[error("{document_type} {id} not found")]
    NotFound {
        /// The requested type.
        document_type: DocumentType,
        /// The requested id.
        id: String,
    },
}

impl WorkflowError {
    /// Returns the error code for the calling UI.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::UnsupportedConversion { .. } => "UNSUPPORTED_CONVERSION",
            Self::UnknownAction { .. } => "UNKNOWN_ACTION",
            Self::NotFound { .. } => "DOCUMENT_NOT_FOUND",
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidState { ref status, .. } => Self::InvalidState {
                status: status.clone(),
                message: err.to_string(),
            },
            WorkflowError::NotFound { .. } => Self::NotFound(err.to_string()),
            WorkflowError::UnsupportedConversion { .. } | WorkflowError::UnknownAction { .. } => {
                Self::Validation(err.to_string())
            }
        }
    }
}
