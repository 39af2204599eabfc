//! The document engine: every service wired over one store.

use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use tracing::info;

use docket_core::customization::{
    CustomizationResolver, CustomizationSettings, RenderFormat, ResolveContext, SettingsPatch,
};
use docket_core::document::{Document, DocumentDetails, DocumentType};
use docket_core::export::{
    ExportDispatcher, ExportFormat, ExportReport, FileSystemSurface, MemorySurface, RenderSurface,
};
use docket_core::render::{DocumentRenderer, RenderedDocument};
use docket_shared::AppConfig;
use docket_shared::config::StorageBackend;

use crate::company::CompanyRepository;
use crate::customization::CustomizationRepository;
use crate::documents::DocumentStore;
use crate::error::StoreError;
use crate::kv::{FileStore, KeyValueStore, MemoryStore};
use crate::numbering::NumberingService;
use crate::workflow::DocumentWorkflow;

/// The key-value backend shared by every service.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// The surface exports are delivered to.
pub type SharedSurface = Arc<dyn RenderSurface>;

/// One object holding the stores, the numbering service, the workflow and
/// the export dispatcher. Construct once and pass by reference.
pub struct DocumentEngine {
    config: AppConfig,
    documents: Arc<DocumentStore<SharedStore>>,
    numbering: Arc<NumberingService<SharedStore>>,
    customizations: CustomizationRepository<SharedStore>,
    company: CompanyRepository<SharedStore>,
    workflow: DocumentWorkflow<SharedStore>,
    dispatcher: ExportDispatcher<SharedSurface>,
}

impl std::fmt::Debug for DocumentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DocumentEngine {
    /// Builds the engine from configuration: the configured storage backend
    /// and a file-system surface under `export.output_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file backend's directory cannot be created.
    pub fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let store: SharedStore = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::File => Arc::new(FileStore::open(&config.storage.data_dir)?),
        };
        let surface: SharedSurface = Arc::new(FileSystemSurface::new(&config.export.output_dir));
        info!(
            backend = ?config.storage.backend,
            data_dir = %config.storage.data_dir.display(),
            output_dir = %config.export.output_dir.display(),
            "Document engine ready"
        );
        Ok(Self::with_parts(config, store, surface))
    }

    /// Builds the engine over an in-memory store and surface.
    #[must_use]
    pub fn in_memory(config: AppConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemorySurface::new()),
        )
    }

    /// Builds the engine over an injected store and surface.
    #[must_use]
    pub fn with_parts(config: AppConfig, store: SharedStore, surface: SharedSurface) -> Self {
        let documents = Arc::new(DocumentStore::new(Arc::clone(&store)));
        let numbering = Arc::new(NumberingService::new(
            Arc::clone(&store),
            &config.numbering,
        ));
        let workflow = DocumentWorkflow::new(
            Arc::clone(&documents),
            Arc::clone(&numbering),
            config.workflow.clone(),
        );
        Self {
            documents,
            numbering,
            customizations: CustomizationRepository::new(Arc::clone(&store)),
            company: CompanyRepository::new(store),
            workflow,
            dispatcher: ExportDispatcher::new(surface),
            config,
        }
    }

    /// Replaces the workflow, e.g. to attach a remote source.
    #[must_use]
    pub fn with_workflow(mut self, workflow: DocumentWorkflow<SharedStore>) -> Self {
        self.workflow = workflow;
        self
    }

    /// The configuration the engine was built from.
    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The document store.
    #[must_use]
    pub fn documents(&self) -> &DocumentStore<SharedStore> {
        &self.documents
    }

    /// Shared handle to the document store.
    #[must_use]
    pub fn documents_handle(&self) -> Arc<DocumentStore<SharedStore>> {
        Arc::clone(&self.documents)
    }

    /// The numbering service.
    #[must_use]
    pub fn numbering(&self) -> &NumberingService<SharedStore> {
        &self.numbering
    }

    /// Shared handle to the numbering service.
    #[must_use]
    pub fn numbering_handle(&self) -> Arc<NumberingService<SharedStore>> {
        Arc::clone(&self.numbering)
    }

    /// Customization records.
    #[must_use]
    pub const fn customizations(&self) -> &CustomizationRepository<SharedStore> {
        &self.customizations
    }

    /// The company profile.
    #[must_use]
    pub const fn company(&self) -> &CompanyRepository<SharedStore> {
        &self.company
    }

    /// The workflow.
    #[must_use]
    pub const fn workflow(&self) -> &DocumentWorkflow<SharedStore> {
        &self.workflow
    }

    /// The export dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &ExportDispatcher<SharedSurface> {
        &self.dispatcher
    }

    /// A resolver carrying the stored company branding and payment details.
    #[must_use]
    pub fn resolver(&self) -> CustomizationResolver {
        let profile = self.company.profile();
        CustomizationResolver::new(&self.config.customization)
            .with_branding(profile.effective_branding())
            .with_payment(profile.payment_details())
    }

    /// A new, unsaved document with a fresh number and the company's
    /// snapshot and default terms.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be persisted.
    pub fn draft(&self, document_type: DocumentType) -> Result<Document, StoreError> {
        self.draft_on(document_type, Utc::now().date_naive())
    }

    /// A new, unsaved document dated `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be persisted.
    pub fn draft_on(
        &self,
        document_type: DocumentType,
        today: NaiveDate,
    ) -> Result<Document, StoreError> {
        let number = self.numbering.next_on(document_type.as_str(), today)?;
        let profile = self.company.profile();
        let after = |days: u32| today.checked_add_days(Days::new(u64::from(days)));

        let mut document =
            Document::new(document_type, number.value, today).with_company(profile.company);
        document.terms = profile.default_terms;
        match &mut document.details {
            DocumentDetails::Quote { valid_until } => {
                *valid_until = after(self.config.workflow.quote_validity_days);
            }
            DocumentDetails::Invoice { due_date, .. } => {
                *due_date = after(self.config.workflow.invoice_due_days);
            }
            _ => {}
        }
        Ok(document)
    }

    /// Resolves render settings for a document, starting from its type's
    /// default customization record.
    ///
    /// # Errors
    ///
    /// Returns an error if a newly created default record cannot be
    /// persisted.
    pub fn resolve_settings(
        &self,
        document: &Document,
        overrides: Option<&SettingsPatch>,
        context: ResolveContext,
    ) -> Result<CustomizationSettings, StoreError> {
        let base = self
            .customizations
            .default_for(document.document_type())?
            .settings;
        let context = ResolveContext {
            facts: context
                .facts
                .or_else(|| ResolveContext::for_document(document).facts),
            ..context
        };
        Ok(self.resolver().resolve_from(base, overrides, &context))
    }

    /// Loads and renders a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or a default record
    /// cannot be persisted.
    pub fn render(
        &self,
        document_type: DocumentType,
        id: &str,
        format: RenderFormat,
    ) -> Result<RenderedDocument, StoreError> {
        let document = self.workflow.find(document_type, id)?;
        let settings = self.resolve_settings(
            &document,
            None,
            ResolveContext::default().with_format(format),
        )?;
        Ok(DocumentRenderer::render(&document, &settings))
    }

    /// Renders every document of a type in parallel.
    ///
    /// # Errors
    ///
    /// Returns an error if a default record cannot be persisted.
    pub fn render_all(
        &self,
        document_type: DocumentType,
        format: RenderFormat,
    ) -> Result<Vec<RenderedDocument>, StoreError> {
        let jobs = self
            .documents
            .list(document_type)
            .into_iter()
            .map(|document| {
                let settings = self.resolve_settings(
                    &document,
                    None,
                    ResolveContext::default().with_format(format),
                )?;
                Ok((document, settings))
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        Ok(DocumentRenderer::render_many(&jobs))
    }

    /// Loads, renders and exports a document.
    ///
    /// Lookup failures are errors; delivery failures are reported in the
    /// returned [`ExportReport`].
    ///
    /// # Errors
    ///
    /// Returns an error if the document is missing or a default record
    /// cannot be persisted.
    pub fn export(
        &self,
        document_type: DocumentType,
        id: &str,
        format: ExportFormat,
    ) -> Result<ExportReport, StoreError> {
        let document = self.workflow.find(document_type, id)?;
        let mut context = ResolveContext::default().with_format(format.render_format());
        if format == ExportFormat::Preview {
            context = context.preview();
        }
        let settings = self.resolve_settings(&document, None, context)?;
        let rendered = DocumentRenderer::render(&document, &settings);
        Ok(self.dispatcher.dispatch(&rendered, format))
    }
}
