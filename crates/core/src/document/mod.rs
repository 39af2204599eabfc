//! Commercial document model.
//!
//! # Modules
//!
//! - `kind` - The closed set of document types and their fixed lookups
//! - `status` - Lifecycle statuses and lenient parsing
//! - `types` - Documents, line items, parties and type-specific details
//! - `error` - Validation errors

pub mod error;
pub mod kind;
pub mod status;
pub mod types;


pub use error::ValidationError;
pub use kind::{DocumentType, PartyRole};
pub use status::DocumentStatus;
pub use types::{
    Company, ConversionHistory, Document, DocumentDetails, LineItem, Party, ReportRow,
    SignatureSettings, SourceReference,
};
