//! Persistence layer for Docket.
//!
//! This crate provides:
//! - The key-value store seam with in-memory and file-backed implementations
//! - The document store, one JSON collection per document type
//! - The numbering service holding counter state
//! - Customization and company profile repositories
//! - Workflow orchestration (conversions and status actions)
//! - The [`DocumentEngine`] facade wiring everything together

pub mod company;
pub mod customization;
pub mod documents;
pub mod engine;
pub mod error;
pub mod kv;
pub mod numbering;
pub mod remote;
pub mod workflow;

pub use company::CompanyRepository;
pub use customization::CustomizationRepository;
pub use documents::DocumentStore;
pub use engine::{DocumentEngine, SharedStore, SharedSurface};
pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, KvError, LoadOrigin, Loaded, MemoryStore};
pub use numbering::NumberingService;
pub use remote::{NoRemote, RemoteDocumentSource};
pub use workflow::DocumentWorkflow;
