//! Customization records, one collection per document type.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use tracing::info;

use docket_core::customization::CustomizationRecord;
use docket_core::document::DocumentType;

use crate::error::StoreError;
use crate::kv::{
    Collection, KeyValueStore, load_collection, read_collection, save_collection,
};

/// Storage key for a type's customization records.
#[must_use]
pub fn storage_key(document_type: DocumentType) -> String {
    format!("customization.{}", document_type.as_str())
}

/// Stores customization records. Each type has exactly one default record,
/// created from the built-in template on first access and never deleted.
#[derive(Debug)]
pub struct CustomizationRepository<S> {
    kv: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> CustomizationRepository<S> {
    /// Creates a repository over a key-value backend.
    #[must_use]
    pub const fn new(kv: S) -> Self {
        Self {
            kv,
            write_lock: Mutex::new(()),
        }
    }

    fn load(&self, document_type: DocumentType) -> Vec<CustomizationRecord> {
        load_collection(&self.kv, &storage_key(document_type))
            .value
            .into_values()
    }

    fn read(
        &self,
        document_type: DocumentType,
    ) -> Result<Collection<CustomizationRecord>, StoreError> {
        Ok(read_collection(&self.kv, &storage_key(document_type))?)
    }

    /// The type's default record, creating and persisting it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or a newly created
    /// default cannot be persisted.
    pub fn default_for(
        &self,
        document_type: DocumentType,
    ) -> Result<CustomizationRecord, StoreError> {
        if let Some(record) = self
            .load(document_type)
            .into_iter()
            .find(|record| record.is_default)
        {
            return Ok(record);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read(document_type)?;
        if let Some(record) = records.records().find(|record| record.is_default) {
            return Ok(record.clone());
        }

        let record = CustomizationRecord::default_for(document_type);
        records.push_front(record.clone());
        save_collection(&self.kv, &storage_key(document_type), &records)?;
        info!(
            document_type = %document_type,
            customization_id = %record.id,
            "Default customization created"
        );
        Ok(record)
    }

    /// All records for a type, default first.
    ///
    /// # Errors
    ///
    /// Returns an error if a newly created default cannot be persisted.
    pub fn list(&self, document_type: DocumentType) -> Result<Vec<CustomizationRecord>, StoreError> {
        self.default_for(document_type)?;
        let mut records = self.load(document_type);
        records.sort_by_key(|record| !record.is_default);
        Ok(records)
    }

    /// Finds a record by id.
    #[must_use]
    pub fn get(&self, document_type: DocumentType, id: &str) -> Option<CustomizationRecord> {
        self.load(document_type)
            .into_iter()
            .find(|record| record.id == *id)
    }

    /// Creates or replaces a record by id. Saving a record flagged default
    /// makes it the type's only default.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(&self, mut record: CustomizationRecord) -> Result<CustomizationRecord, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let document_type = record.document_type;
        let mut records = self.read(document_type)?;

        record.settings.document_type = document_type;
        record.updated_at = Some(Utc::now());
        if record.is_default {
            for other in records.records_mut() {
                other.is_default = false;
            }
        }

        let found = records.records_mut().find(|existing| existing.id == record.id);
        match found {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        save_collection(&self.kv, &storage_key(document_type), &records)?;
        info!(
            document_type = %document_type,
            customization_id = %record.id,
            is_default = record.is_default,
            "Customization saved"
        );
        Ok(record)
    }

    /// Deletes a non-default record.
    ///
    /// # Returns
    ///
    /// `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Protected`] for the default record, or an error
    /// if the write fails.
    pub fn delete(&self, document_type: DocumentType, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read(document_type)?;

        let Some(target) = records.records().find(|record| record.id == *id) else {
            return Ok(false);
        };
        if target.is_default {
            return Err(StoreError::Protected(id.to_string()));
        }

        records.retain(|record| record.id != *id);
        save_collection(&self.kv, &storage_key(document_type), &records)?;
        info!(document_type = %document_type, customization_id = id, "Customization deleted");
        Ok(true)
    }
}
