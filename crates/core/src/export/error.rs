//! Export error types.

use thiserror::Error;

use docket_shared::AppError;

/// Errors raised while delivering an artifact to a rendering surface.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the artifact failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The surface refused or failed the delivery.
    #[error("Rendering surface error: {0}")]
    Surface(String),

    /// The format name is not known.
    #[error("Unknown export format '{0}'")]
    UnknownFormat(String),
}

impl ExportError {
    /// Returns the error code for the calling UI.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Write { .. } => "EXPORT_WRITE_FAILED",
            Self::Surface(_) => "EXPORT_SURFACE_FAILED",
            Self::UnknownFormat(_) => "UNKNOWN_EXPORT_FORMAT",
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::UnknownFormat(_) => Self::Validation(err.to_string()),
            ExportError::Write { .. } | ExportError::Surface(_) => Self::Export(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_error_maps_to_export() {
        let err = ExportError::Write {
            path: "/tmp/out/INV-1.html".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.error_code(), "EXPORT_WRITE_FAILED");
        assert_eq!(AppError::from(err).error_code(), "EXPORT_FAILED");
    }

    #[test]
    fn test_unknown_format_is_validation() {
        let err = ExportError::UnknownFormat("pdfx".into());
        assert_eq!(err.to_string(), "Unknown export format 'pdfx'");
        assert_eq!(AppError::from(err).error_code(), "VALIDATION_ERROR");
    }
}
