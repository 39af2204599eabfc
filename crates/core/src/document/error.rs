//! Document validation errors.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::document::kind::DocumentType;
use docket_shared::AppError;

/// Errors raised when a document is malformed at save time.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required document field is empty.
    #[error("Required field '{0}' is missing")]
    MissingField(&'static str),

    /// A line item has no description.
    #[error("Line {line} has no description")]
    MissingDescription {
        /// One-based line number.
        line: usize,
    },

    /// A line item quantity is zero or negative.
    #[error("Line {line} quantity must be positive, got {quantity}")]
    NonPositiveQuantity {
        /// One-based line number.
        line: usize,
        /// The offending quantity.
        quantity: Decimal,
    },

    /// A line item price is negative.
    #[error("Line {line} unit price cannot be negative, got {unit_price}")]
    NegativePrice {
        /// One-based line number.
        line: usize,
        /// The offending price.
        unit_price: Decimal,
    },

    /// The document discount is negative.
    #[error("Discount cannot be negative, got {0}")]
    NegativeDiscount(Decimal),

    /// The document's details belong to another type.
    #[error("Expected a {expected} document, got {found}")]
    TypeMismatch {
        /// Type of the collection being written.
        expected: DocumentType,
        /// Type the document's details describe.
        found: DocumentType,
    },
}

impl ValidationError {
    /// Returns the error code for the calling UI.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::MissingDescription { .. } => "MISSING_DESCRIPTION",
            Self::NonPositiveQuantity { .. } => "INVALID_QUANTITY",
            Self::NegativePrice { .. } => "INVALID_PRICE",
            Self::NegativeDiscount(_) => "INVALID_DISCOUNT",
            Self::TypeMismatch { .. } => "DOCUMENT_TYPE_MISMATCH",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}
