//! Export of rendered documents.
//!
//! The dispatcher wraps rendered markup in the envelope for the requested
//! format and hands the artifact to a [`RenderSurface`]. The markup itself
//! is never altered between formats.
//!
//! # Modules
//!
//! - `format` - Export formats, MIME types and extensions
//! - `envelope` - HTML, web archive, word-processor and print envelopes
//! - `surface` - Rendering surfaces (memory, file system)
//! - `dispatcher` - Routing and failure reporting

pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod format;
pub mod surface;


pub use dispatcher::{ExportDispatcher, ExportReport, ExportStatus};
pub use error::ExportError;
pub use format::ExportFormat;
pub use surface::{ExportArtifact, FileSystemSurface, MemorySurface, RenderSurface};
