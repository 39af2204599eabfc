//! Export formats.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ExportError;
use crate::customization::RenderFormat;

/// Output encodings a rendered document can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// Standalone HTML file.
    Html,
    /// Single-file web archive (MHT).
    Archival,
    /// Word-processor compatible markup.
    Word,
    /// Print job; the surface's own print-to-PDF produces the PDF.
    PdfViaPrint,
    /// In-memory preview.
    Preview,
}

impl ExportFormat {
    /// All formats.
    pub const ALL: [Self; 5] = [
        Self::Html,
        Self::Archival,
        Self::Word,
        Self::PdfViaPrint,
        Self::Preview,
    ];

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Archival => "archival",
            Self::Word => "word",
            Self::PdfViaPrint => "pdf_via_print",
            Self::Preview => "preview",
        }
    }

    /// MIME type of the artifact.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Html | Self::PdfViaPrint | Self::Preview => "text/html",
            Self::Archival => "multipart/related",
            Self::Word => "application/msword",
        }
    }

    /// File extension of the artifact.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html | Self::PdfViaPrint | Self::Preview => "html",
            Self::Archival => "mht",
            Self::Word => "doc",
        }
    }

    /// Format the customization should be resolved for.
    #[must_use]
    pub const fn render_format(&self) -> RenderFormat {
        match self {
            Self::Html | Self::Preview => RenderFormat::Screen,
            Self::PdfViaPrint => RenderFormat::Print,
            Self::Archival | Self::Word => RenderFormat::Archival,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "html" => Ok(Self::Html),
            "archival" | "mht" | "mhtml" => Ok(Self::Archival),
            "word" | "doc" => Ok(Self::Word),
            "pdf_via_print" | "pdf" | "print" => Ok(Self::PdfViaPrint),
            "preview" => Ok(Self::Preview),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ExportFormat::Html, "text/html", "html")]
    #[case(ExportFormat::Archival, "multipart/related", "mht")]
    #[case(ExportFormat::Word, "application/msword", "doc")]
    #[case(ExportFormat::PdfViaPrint, "text/html", "html")]
    fn test_mime_and_extension(
        #[case] format: ExportFormat,
        #[case] mime: &str,
        #[case] extension: &str,
    ) {
        assert_eq!(format.mime_type(), mime);
        assert_eq!(format.extension(), extension);
    }

    #[test]
    fn test_parse() {
        for format in ExportFormat::ALL {
            assert_eq!(format.as_str().parse::<ExportFormat>().unwrap(), format);
        }
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::PdfViaPrint);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_print_resolves_for_print() {
        assert_eq!(ExportFormat::PdfViaPrint.render_format(), RenderFormat::Print);
        assert_eq!(ExportFormat::Word.render_format(), RenderFormat::Archival);
    }
}
