//! Document store: one JSON array per document type.
//!
//! Every write reads the whole collection, modifies it and writes it back.
//! Writes to the same type are serialized through a per-type lock so two
//! concurrent saves cannot drop each other's records. Stored records that no
//! longer parse are skipped on read and written back unchanged.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info};

use docket_core::document::{Document, DocumentStatus, DocumentType, ValidationError};
use docket_shared::types::DocumentId;

use crate::error::StoreError;
use crate::kv::{KeyValueStore, Loaded, load_collection, read_collection, save_collection};

/// CRUD and search over documents.
#[derive(Debug)]
pub struct DocumentStore<S> {
    kv: S,
    write_locks: DashMap<DocumentType, Arc<Mutex<()>>>,
}

impl<S: KeyValueStore> DocumentStore<S> {
    /// Creates a store over a key-value backend.
    #[must_use]
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            write_locks: DashMap::new(),
        }
    }

    /// The backend.
    #[must_use]
    pub const fn kv(&self) -> &S {
        &self.kv
    }

    fn write_lock(&self, document_type: DocumentType) -> Arc<Mutex<()>> {
        Arc::clone(self.write_locks.entry(document_type).or_default().value())
    }

    /// Loads a type's collection, reporting whether a fallback was used.
    /// Records that fail to parse are left out and the origin is
    /// `Recovered`.
    #[must_use]
    pub fn load(&self, document_type: DocumentType) -> Loaded<Vec<Document>> {
        let Loaded { value, origin } = load_collection(&self.kv, &document_type.storage_key());
        Loaded {
            value: value.into_values(),
            origin,
        }
    }

    /// All documents of a type, in insertion order.
    #[must_use]
    pub fn list(&self, document_type: DocumentType) -> Vec<Document> {
        self.load(document_type).into_inner()
    }

    /// Finds a document by id.
    #[must_use]
    pub fn get(&self, document_type: DocumentType, id: &str) -> Option<Document> {
        self.list(document_type)
            .into_iter()
            .find(|doc| doc.id.as_ref().is_some_and(|doc_id| doc_id == id))
    }

    /// Creates or replaces a document.
    ///
    /// * No id: a new id and creation timestamp are assigned.
    /// * An id matching a stored record: the record is replaced and the
    ///   update timestamp set.
    /// * An id matching nothing: stored as a new record under that id.
    ///
    /// Amounts are recomputed before writing.
    ///
    /// # Arguments
    ///
    /// * `document_type` - Collection to write to
    /// * `document` - The document; its details must be of `document_type`
    ///
    /// # Returns
    ///
    /// The document as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the document fails validation, or if the
    /// collection cannot be read or written.
    pub fn save(
        &self,
        document_type: DocumentType,
        mut document: Document,
    ) -> Result<Document, StoreError> {
        if document.document_type() != document_type {
            return Err(ValidationError::TypeMismatch {
                expected: document_type,
                found: document.document_type(),
            }
            .into());
        }
        document.validate()?;
        document.recalculate();

        let lock = self.write_lock(document_type);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let key = document_type.storage_key();
        let mut documents = read_collection::<_, Document>(&self.kv, &key)?;
        let now = Utc::now();

        let existing = match document.id.as_ref() {
            Some(id) => documents
                .records_mut()
                .find(|doc| doc.id.as_ref() == Some(id)),
            None => None,
        };

        let created = match existing {
            Some(stored) => {
                document.created_at = stored.created_at.or(document.created_at);
                document.updated_at = Some(now);
                *stored = document.clone();
                false
            }
            None => {
                if document.id.is_none() {
                    document.id = Some(DocumentId::generate());
                }
                document.created_at = document.created_at.or(Some(now));
                documents.push(document.clone());
                true
            }
        };

        save_collection(&self.kv, &key, &documents)?;
        info!(
            document_type = %document_type,
            document_id = ?document.id.as_ref().map(DocumentId::as_str),
            document_number = %document.document_number,
            created,
            "Document saved"
        );
        Ok(document)
    }

    /// Deletes a document.
    ///
    /// # Returns
    ///
    /// `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or written.
    pub fn delete(&self, document_type: DocumentType, id: &str) -> Result<bool, StoreError> {
        let lock = self.write_lock(document_type);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let key = document_type.storage_key();
        let mut documents = read_collection::<_, Document>(&self.kv, &key)?;
        let before = documents.len();
        documents.retain(|doc| !doc.id.as_ref().is_some_and(|doc_id| doc_id == id));
        if documents.len() == before {
            debug!(document_type = %document_type, document_id = id, "Nothing to delete");
            return Ok(false);
        }

        save_collection(&self.kv, &key, &documents)?;
        info!(document_type = %document_type, document_id = id, "Document deleted");
        Ok(true)
    }

    /// Case-insensitive substring search over number, notes and party
    /// name. A blank term matches everything.
    #[must_use]
    pub fn search(&self, document_type: DocumentType, term: &str) -> Vec<Document> {
        let needle = term.trim().to_lowercase();
        let documents = self.list(document_type);
        if needle.is_empty() {
            return documents;
        }
        documents
            .into_iter()
            .filter(|doc| doc.matches_search(&needle))
            .collect()
    }

    /// Documents whose status equals `status`, compared trimmed and
    /// case-insensitively.
    #[must_use]
    pub fn list_by_status(&self, document_type: DocumentType, status: &str) -> Vec<Document> {
        let wanted = DocumentStatus::parse(status);
        let raw = status.trim();
        self.list(document_type)
            .into_iter()
            .filter(|doc| match (wanted, doc.status()) {
                (Some(wanted), Some(actual)) => wanted == actual,
                _ => doc.status.trim().eq_ignore_ascii_case(raw),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use docket_core::document::{LineItem, Party};

    use super::*;
    use crate::kv::{LoadOrigin, MemoryStore};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn quote(number: &str, party: &str) -> Document {
        Document::new(DocumentType::Quote, number, date())
            .with_party(Party::named(party))
            .with_items(vec![LineItem::new("Survey", dec!(1), dec!(500))])
    }

    #[test]
    fn test_save_without_id_creates() {
        let store = DocumentStore::new(MemoryStore::new());

        let saved = store.save(DocumentType::Quote, quote("QT-1", "Acme")).unwrap();

        assert!(saved.id.is_some());
        assert!(saved.created_at.is_some());
        assert!(saved.updated_at.is_none());
        assert_eq!(store.list(DocumentType::Quote).len(), 1);
    }

    #[test]
    fn test_save_with_matching_id_replaces() {
        let store = DocumentStore::new(MemoryStore::new());
        let mut saved = store.save(DocumentType::Quote, quote("QT-1", "Acme")).unwrap();
        let created_at = saved.created_at;

        saved.notes = Some("Revised".to_string());
        saved.created_at = None;
        let updated = store.save(DocumentType::Quote, saved).unwrap();

        let all = store.list(DocumentType::Quote);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].notes.as_deref(), Some("Revised"));
        assert_eq!(updated.created_at, created_at);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn test_save_with_unknown_id_inserts_under_that_id() {
        let store = DocumentStore::new(MemoryStore::new());
        let mut doc = quote("QT-9", "Acme");
        doc.id = Some(DocumentId::new("legacy-42"));

        let saved = store.save(DocumentType::Quote, doc).unwrap();

        assert_eq!(saved.id.as_ref().map(DocumentId::as_str), Some("legacy-42"));
        assert!(store.get(DocumentType::Quote, "legacy-42").is_some());
    }

    #[test]
    fn test_save_rejects_wrong_collection() {
        let store = DocumentStore::new(MemoryStore::new());
        let err = store
            .save(DocumentType::Invoice, quote("QT-1", "Acme"))
            .unwrap_err();
        assert_eq!(err.error_code(), "DOCUMENT_TYPE_MISMATCH");
    }

    #[test]
    fn test_save_rejects_invalid_items() {
        let store = DocumentStore::new(MemoryStore::new());
        let doc = Document::new(DocumentType::Quote, "QT-1", date())
            .with_items(vec![LineItem::new("  ", dec!(1), dec!(10))]);

        let err = store.save(DocumentType::Quote, doc).unwrap_err();

        assert_eq!(err.error_code(), "MISSING_DESCRIPTION");
        assert!(store.list(DocumentType::Quote).is_empty());
    }

    #[test]
    fn test_save_recomputes_amounts() {
        let store = DocumentStore::new(MemoryStore::new());
        let mut doc = quote("QT-1", "Acme");
        doc.items[0].quantity = dec!(3);

        let saved = store.save(DocumentType::Quote, doc).unwrap();

        assert_eq!(saved.subtotal, dec!(1500));
    }

    #[test]
    fn test_delete() {
        let store = DocumentStore::new(MemoryStore::new());
        let saved = store.save(DocumentType::Quote, quote("QT-1", "Acme")).unwrap();
        let id = saved.id.unwrap();

        assert!(store.delete(DocumentType::Quote, id.as_str()).unwrap());
        assert!(!store.delete(DocumentType::Quote, id.as_str()).unwrap());
        assert!(store.get(DocumentType::Quote, id.as_str()).is_none());
    }

    #[test]
    fn test_search_matches_number_notes_and_party() {
        let store = DocumentStore::new(MemoryStore::new());
        store.save(DocumentType::Quote, quote("QT-1", "Acme Ltd")).unwrap();
        let mut noted = quote("QT-2", "Globex");
        noted.notes = Some("Urgent delivery".to_string());
        store.save(DocumentType::Quote, noted).unwrap();

        assert_eq!(store.search(DocumentType::Quote, "ACME").len(), 1);
        assert_eq!(store.search(DocumentType::Quote, "urgent").len(), 1);
        assert_eq!(store.search(DocumentType::Quote, "qt-").len(), 2);
        assert_eq!(store.search(DocumentType::Quote, "  ").len(), 2);
        assert!(store.search(DocumentType::Quote, "initech").is_empty());
    }

    #[test]
    fn test_list_by_status_normalizes() {
        let store = DocumentStore::new(MemoryStore::new());
        store.save(DocumentType::Quote, quote("QT-1", "Acme")).unwrap();
        let mut sent = quote("QT-2", "Acme");
        sent.status = " Sent ".to_string();
        store.save(DocumentType::Quote, sent).unwrap();

        assert_eq!(store.list_by_status(DocumentType::Quote, "sent").len(), 1);
        assert_eq!(store.list_by_status(DocumentType::Quote, "DRAFT").len(), 1);
    }

    #[test]
    fn test_unreadable_record_survives_save() {
        let store = DocumentStore::new(MemoryStore::new());
        store.save(DocumentType::Quote, quote("QT-1", "Acme")).unwrap();
        store.save(DocumentType::Quote, quote("QT-2", "Globex")).unwrap();

        let mut raw: Vec<serde_json::Value> =
            serde_json::from_str(&store.kv().get("documents.quote").unwrap().unwrap()).unwrap();
        raw[1].as_object_mut().unwrap().remove("date");
        store
            .kv()
            .set("documents.quote", &serde_json::to_string(&raw).unwrap())
            .unwrap();

        let loaded = store.load(DocumentType::Quote);
        assert_eq!(loaded.origin, LoadOrigin::Recovered);
        assert_eq!(loaded.value.len(), 1);
        assert_eq!(loaded.value[0].document_number, "QT-1");

        store.save(DocumentType::Quote, quote("QT-3", "Initech")).unwrap();

        let stored: Vec<serde_json::Value> =
            serde_json::from_str(&store.kv().get("documents.quote").unwrap().unwrap()).unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[1]["documentNumber"], "QT-2");
        assert_eq!(store.list(DocumentType::Quote).len(), 2);
    }

    #[test]
    fn test_corrupt_collection_reads_as_empty() {
        let kv = MemoryStore::new();
        kv.set("documents.invoice", "not json").unwrap();
        let store = DocumentStore::new(kv);

        let loaded = store.load(DocumentType::Invoice);

        assert_eq!(loaded.origin, LoadOrigin::Recovered);
        assert!(loaded.value.is_empty());
        assert!(store.get(DocumentType::Invoice, "anything").is_none());
    }
}
