//! Rendering surfaces: where exported artifacts end up.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::error::ExportError;
use super::format::ExportFormat;

/// An encoded document ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportArtifact {
    /// Encoding.
    pub format: ExportFormat,
    /// File name including extension.
    pub file_name: String,
    /// MIME type.
    pub mime_type: String,
    /// Encoded content.
    pub content: String,
}

/// A target that accepts complete artifacts.
///
/// `download` stores the artifact as a file with its MIME type and name;
/// `print` opens it for printing (the surface's print-to-PDF produces any
/// PDF). Both return a location describing where the artifact went.
pub trait RenderSurface: Send + Sync {
    /// Delivers a downloadable file.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot accept the artifact.
    fn download(&self, artifact: &ExportArtifact) -> Result<String, ExportError>;

    /// Opens the artifact and triggers printing.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot accept the artifact.
    fn print(&self, artifact: &ExportArtifact) -> Result<String, ExportError>;
}

impl<T: RenderSurface + ?Sized> RenderSurface for Arc<T> {
    fn download(&self, artifact: &ExportArtifact) -> Result<String, ExportError> {
        (**self).download(artifact)
    }

    fn print(&self, artifact: &ExportArtifact) -> Result<String, ExportError> {
        (**self).print(artifact)
    }
}

/// Keeps artifacts in memory. Used for previews and tests.
#[derive(Debug, Default)]
pub struct MemorySurface {
    downloads: Mutex<Vec<ExportArtifact>>,
    print_jobs: Mutex<Vec<ExportArtifact>>,
}

impl MemorySurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts delivered as downloads, in order.
    #[must_use]
    pub fn downloads(&self) -> Vec<ExportArtifact> {
        self.downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Artifacts sent to print, in order.
    #[must_use]
    pub fn print_jobs(&self) -> Vec<ExportArtifact> {
        self.print_jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RenderSurface for MemorySurface {
    fn download(&self, artifact: &ExportArtifact) -> Result<String, ExportError> {
        let mut downloads = self
            .downloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        downloads.push(artifact.clone());
        Ok(format!("memory://downloads/{}", artifact.file_name))
    }

    fn print(&self, artifact: &ExportArtifact) -> Result<String, ExportError> {
        let mut jobs = self
            .print_jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        jobs.push(artifact.clone());
        Ok(format!("memory://print/{}", artifact.file_name))
    }
}

/// Writes downloads under a directory and print jobs under its `print/`
/// subdirectory.
#[derive(Debug, Clone)]
pub struct FileSystemSurface {
    root: PathBuf,
}

impl FileSystemSurface {
    /// Creates a surface rooted at `root`. Directories are created on first
    /// write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write(dir: &Path, artifact: &ExportArtifact) -> Result<String, ExportError> {
        let path = dir.join(&artifact.file_name);
        let to_error = |source| ExportError::Write {
            path: path.display().to_string(),
            source,
        };
        fs::create_dir_all(dir).map_err(to_error)?;
        fs::write(&path, artifact.content.as_bytes()).map_err(to_error)?;
        Ok(path.display().to_string())
    }
}

impl RenderSurface for FileSystemSurface {
    fn download(&self, artifact: &ExportArtifact) -> Result<String, ExportError> {
        Self::write(&self.root, artifact)
    }

    fn print(&self, artifact: &ExportArtifact) -> Result<String, ExportError> {
        Self::write(&self.root.join("print"), artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> ExportArtifact {
        ExportArtifact {
            format: ExportFormat::Html,
            file_name: "INV-2024-0001.html".to_string(),
            mime_type: "text/html".to_string(),
            content: "<html></html>".to_string(),
        }
    }

    #[test]
    fn test_memory_surface_records_deliveries() {
        let surface = MemorySurface::new();
        let location = surface.download(&artifact()).unwrap();
        assert_eq!(location, "memory://downloads/INV-2024-0001.html");
        surface.print(&artifact()).unwrap();

        assert_eq!(surface.downloads(), vec![artifact()]);
        assert_eq!(surface.print_jobs().len(), 1);
    }

    #[test]
    fn test_file_surface_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let surface = FileSystemSurface::new(dir.path().join("exports"));

        let location = surface.download(&artifact()).unwrap();
        let written = fs::read_to_string(&location).unwrap();
        assert_eq!(written, "<html></html>");

        let printed = surface.print(&artifact()).unwrap();
        assert!(Path::new(&printed).starts_with(dir.path().join("exports").join("print")));
    }

    #[test]
    fn test_file_surface_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let surface = FileSystemSurface::new(&blocker);

        let err = surface.download(&artifact()).unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_WRITE_FAILED");
    }
}
