//! Export dispatch.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::envelope;
use super::format::ExportFormat;
use super::surface::{ExportArtifact, RenderSurface};
use crate::render::RenderedDocument;

/// Outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportStatus {
    /// Handed to the surface.
    Delivered {
        /// Where the surface put it.
        location: String,
    },
    /// Returned in memory.
    Preview {
        /// The page.
        content: String,
    },
    /// Delivery failed; nothing was written.
    Failed {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
    },
}

/// What the caller gets back from a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    /// Requested format.
    pub format: ExportFormat,
    /// Artifact file name.
    pub file_name: String,
    /// Artifact MIME type.
    pub mime_type: String,
    /// Outcome.
    #[serde(flatten)]
    pub status: ExportStatus,
}

impl ExportReport {
    /// True unless delivery failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self.status, ExportStatus::Failed { .. })
    }
}

/// Routes rendered documents to an encoding and a surface.
#[derive(Debug)]
pub struct ExportDispatcher<S> {
    surface: S,
}

impl<S: RenderSurface> ExportDispatcher<S> {
    /// Creates a dispatcher delivering to `surface`.
    #[must_use]
    pub const fn new(surface: S) -> Self {
        Self { surface }
    }

    /// The surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Encodes a rendered document without delivering it.
    #[must_use]
    pub fn encode(rendered: &RenderedDocument, format: ExportFormat) -> ExportArtifact {
        let content = match format {
            ExportFormat::Html | ExportFormat::Preview => envelope::html_document(rendered),
            ExportFormat::Archival => envelope::archival_document(rendered),
            ExportFormat::Word => envelope::word_document(rendered),
            ExportFormat::PdfViaPrint => envelope::print_document(rendered),
        };
        ExportArtifact {
            format,
            file_name: format!("{}.{}", rendered.file_stem(), format.extension()),
            mime_type: format.mime_type().to_string(),
            content,
        }
    }

    /// Encodes and delivers a rendered document.
    ///
    /// Never fails: surface errors are logged and reported as
    /// [`ExportStatus::Failed`].
    pub fn dispatch(&self, rendered: &RenderedDocument, format: ExportFormat) -> ExportReport {
        let artifact = Self::encode(rendered, format);
        let file_name = artifact.file_name.clone();
        let mime_type = artifact.mime_type.clone();

        let delivered = match format {
            ExportFormat::Preview => {
                return ExportReport {
                    format,
                    file_name,
                    mime_type,
                    status: ExportStatus::Preview {
                        content: artifact.content,
                    },
                };
            }
            ExportFormat::PdfViaPrint => self.surface.print(&artifact),
            ExportFormat::Html | ExportFormat::Archival | ExportFormat::Word => {
                self.surface.download(&artifact)
            }
        };

        let status = match delivered {
            Ok(location) => {
                info!(
                    document_type = %rendered.document_type,
                    format = %format,
                    location = %location,
                    "Export delivered"
                );
                ExportStatus::Delivered { location }
            }
            Err(err) => {
                error!(
                    document_type = %rendered.document_type,
                    format = %format,
                    error = %err,
                    "Export failed"
                );
                ExportStatus::Failed {
                    code: err.error_code().to_string(),
                    message: err.to_string(),
                }
            }
        };

        ExportReport {
            format,
            file_name,
            mime_type,
            status,
        }
    }
}
