//! Document renderer.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::html::escape_html;
use super::sections;
use super::style::stylesheet;
use crate::customization::{CustomizationSettings, RenderFormat};
use crate::document::{Document, DocumentType};

/// Markup and stylesheet for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    /// Type rendered.
    pub document_type: DocumentType,
    /// Page title, e.g. `INVOICE INV-2024-0001`.
    pub title: String,
    /// Body markup.
    pub markup: String,
    /// Stylesheet the markup expects.
    pub stylesheet: String,
    /// Format the settings were resolved for.
    pub format: RenderFormat,
}

impl RenderedDocument {
    /// Suggested file name without extension (`INV-2024-0001`, or the type
    /// when the document has no number yet).
    #[must_use]
    pub fn file_stem(&self) -> String {
        let number = self
            .title
            .strip_prefix(self.document_type.title())
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let stem = number.unwrap_or_else(|| self.document_type.as_str());
        stem.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// A complete standalone HTML page.
    #[must_use]
    pub fn to_html(&self) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{css}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
            title = escape_html(&self.title),
            css = self.stylesheet,
            body = self.markup,
        )
    }
}

/// Renders documents into markup. Stateless: everything it needs is in the
/// document and the resolved settings.
pub struct DocumentRenderer;

impl DocumentRenderer {
    /// Renders one document.
    ///
    /// The body is built from the same section sequence for every type; the
    /// type decides which sections have content (reports print their rows
    /// in place of the item table, delivery paperwork prints no amounts).
    ///
    /// # Arguments
    ///
    /// * `document` - Document to render, with amounts already calculated
    /// * `settings` - Fully resolved customization
    #[must_use]
    pub fn render(document: &Document, settings: &CustomizationSettings) -> RenderedDocument {
        let document_type = document.document_type();
        let body = match document_type {
            DocumentType::FinancialReport => sections::report_rows(document),
            DocumentType::Quote
            | DocumentType::SalesOrder
            | DocumentType::Invoice
            | DocumentType::PurchaseOrder
            | DocumentType::DeliveryNote
            | DocumentType::PaymentReceipt
            | DocumentType::GoodsReceivingVoucher => [
                sections::items_table(document, settings),
                sections::totals(document, settings),
            ]
            .concat(),
        };

        let markup = [
            format!(
                r#"<div class="document {}">"#,
                document_type.as_str().replace('_', "-")
            ),
            sections::watermark(settings),
            sections::header(document, settings),
            sections::party(document, settings),
            body,
            sections::payment(document, settings),
            sections::notes(document, settings),
            sections::signature(document, settings),
            sections::qr_code(document, settings),
            sections::footer(document, settings),
            "</div>".to_string(),
        ]
        .concat();

        let title = if document.document_number.trim().is_empty() {
            document_type.title().to_string()
        } else {
            format!(
                "{} {}",
                document_type.title(),
                document.document_number.trim()
            )
        };

        RenderedDocument {
            document_type,
            title,
            markup,
            stylesheet: stylesheet(settings),
            format: settings.format,
        }
    }

    /// Renders independent documents in parallel. Output order matches
    /// input order.
    #[must_use]
    pub fn render_many(jobs: &[(Document, CustomizationSettings)]) -> Vec<RenderedDocument> {
        jobs.par_iter()
            .map(|(document, settings)| Self::render(document, settings))
            .collect()
    }
}
