//! Read-only fallback source for documents missing from the local store.

use docket_core::document::{Document, DocumentType};

/// A source of documents not yet migrated into the local store.
///
/// Consulted only when a local lookup misses. Implementations log their
/// own failures and report them as a miss.
pub trait RemoteDocumentSource: Send + Sync {
    /// Fetches a document by type and id.
    fn fetch(&self, document_type: DocumentType, id: &str) -> Option<Document>;
}

/// A remote source that has nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemote;

impl RemoteDocumentSource for NoRemote {
    fn fetch(&self, _document_type: DocumentType, _id: &str) -> Option<Document> {
        None
    }
}
