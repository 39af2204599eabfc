//! Document workflow: conversions and status actions against the store.
//!
//! Transition rules come from [`WorkflowService`]; this type loads the
//! documents, issues numbers and persists the results.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use docket_core::document::{Document, DocumentType};
use docket_core::workflow::{AvailableAction, ConversionCheck, WorkflowError, WorkflowService};
use docket_shared::config::WorkflowConfig;
use docket_shared::types::DocumentId;

use crate::documents::DocumentStore;
use crate::error::StoreError;
use crate::kv::KeyValueStore;
use crate::numbering::NumberingService;
use crate::remote::{NoRemote, RemoteDocumentSource};

/// Converts documents between types and applies status actions.
pub struct DocumentWorkflow<S> {
    documents: Arc<DocumentStore<S>>,
    numbering: Arc<NumberingService<S>>,
    remote: Arc<dyn RemoteDocumentSource>,
    config: WorkflowConfig,
}

impl<S> std::fmt::Debug for DocumentWorkflow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentWorkflow")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> DocumentWorkflow<S> {
    /// Creates a workflow with no remote fallback.
    #[must_use]
    pub fn new(
        documents: Arc<DocumentStore<S>>,
        numbering: Arc<NumberingService<S>>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            documents,
            numbering,
            remote: Arc::new(NoRemote),
            config,
        }
    }

    /// Sets the source consulted when a local lookup misses.
    #[must_use]
    pub fn with_remote(mut self, remote: Arc<dyn RemoteDocumentSource>) -> Self {
        self.remote = remote;
        self
    }

    /// The workflow configuration.
    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Loads a document from the local store, then the remote source.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::NotFound`] if neither has it.
    pub fn find(&self, document_type: DocumentType, id: &str) -> Result<Document, StoreError> {
        if let Some(document) = self.documents.get(document_type, id) {
            return Ok(document);
        }

        let mut document =
            self.remote
                .fetch(document_type, id)
                .ok_or_else(|| WorkflowError::NotFound {
                    document_type,
                    id: id.to_string(),
                })?;
        info!(document_type = %document_type, document_id = id, "Loaded document from remote source");
        if document.id.is_none() {
            document.id = Some(DocumentId::new(id));
        }
        Ok(document)
    }

    /// Converts a document into a new document of another type.
    ///
    /// # Arguments
    ///
    /// * `source_type` - Type of the source document
    /// * `id` - Source document id
    /// * `target_type` - Type to create
    ///
    /// # Returns
    ///
    /// The new document as stored. The source is marked `converted`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source exists in neither the local store nor the remote source
    /// - No conversion exists between the types
    /// - The source's status does not allow the conversion
    /// - A write fails
    pub fn convert(
        &self,
        source_type: DocumentType,
        id: &str,
        target_type: DocumentType,
    ) -> Result<Document, StoreError> {
        self.convert_on(source_type, id, target_type, Utc::now().date_naive())
    }

    /// Converts a document as of `today`.
    ///
    /// # Errors
    ///
    /// See [`convert`](Self::convert).
    pub fn convert_on(
        &self,
        source_type: DocumentType,
        id: &str,
        target_type: DocumentType,
        today: NaiveDate,
    ) -> Result<Document, StoreError> {
        let mut source = self.find(source_type, id)?;

        let check =
            WorkflowService::check_document(&source, target_type, self.config.reconversion)?;
        if matches!(check, ConversionCheck::Reconversion(_)) {
            warn!(
                document_type = %source_type,
                document_id = id,
                target = %target_type,
                "Source already converted to this type, converting again"
            );
        }

        let number = self.numbering.next_on(target_type.as_str(), today)?;
        if !number.authoritative {
            warn!(
                document_type = %target_type,
                number = %number.value,
                "Converted document received a fallback number"
            );
        }

        let target = WorkflowService::build_conversion(
            &source,
            check.rule(),
            number.value,
            today,
            &self.config,
        );
        let target = self.documents.save(target_type, target)?;

        source.mark_converted(target_type);
        self.documents.save(source_type, source)?;

        info!(
            document_type = %source_type,
            document_id = id,
            target = %target_type,
            target_number = %target.document_number,
            "Document converted"
        );
        Ok(target)
    }

    /// Applies a named status action (`send`, `accept`, `mark_paid`, ...).
    ///
    /// # Returns
    ///
    /// The document as stored with its new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing, the action is unknown
    /// for the type, the current status does not allow it, or the write
    /// fails.
    pub fn apply_action(
        &self,
        document_type: DocumentType,
        id: &str,
        action: &str,
    ) -> Result<Document, StoreError> {
        let mut document = self.find(document_type, id)?;
        let previous = document.status.clone();

        let status = WorkflowService::apply_action(document_type, &document.status, action)?;
        document.set_status(status);
        let document = self.documents.save(document_type, document)?;

        info!(
            document_type = %document_type,
            document_id = id,
            action,
            from = %previous,
            to = %status.as_str(),
            "Status changed"
        );
        Ok(document)
    }

    /// Actions offered for a document in `status`: status changes and
    /// conversions.
    #[must_use]
    pub fn available_actions(document_type: DocumentType, status: &str) -> Vec<AvailableAction> {
        WorkflowService::available_actions(document_type, status)
    }

    /// Returns true if a document of `from` type in `status` may be
    /// converted to `to`.
    #[must_use]
    pub fn can_convert(from: DocumentType, to: DocumentType, status: &str) -> bool {
        WorkflowService::can_convert(from, to, status)
    }
}
