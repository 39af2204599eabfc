//! The persistent key-value seam.
//!
//! Values are JSON strings. Reads through [`load_json`] never fail: an
//! absent key yields the default value and a corrupt one is logged and
//! replaced by the default, with [`Loaded::origin`] saying which happened.
//! Writes through [`save_json`] surface every error.
//!
//! # Modules
//!
//! - `collection` - Arrays of records read element by element
//! - `memory` - Process-local store
//! - `file` - One JSON file per key
//! - `error` - Backend errors

pub mod collection;
pub mod error;
pub mod file;
pub mod memory;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

pub use collection::{Collection, load_collection, read_collection, save_collection};
pub use error::KvError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Synchronous string key to JSON string storage.
pub trait KeyValueStore: Send + Sync {
    /// Reads a key. `Ok(None)` when the key was never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Writes a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    /// Removes a key. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn remove(&self, key: &str) -> Result<(), KvError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        (**self).remove(key)
    }
}

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Parsed from a stored value.
    Stored,
    /// The key was absent; the value is the default.
    Missing,
    /// The stored value was unreadable or corrupt, wholly or in part; the
    /// value is the default or what could be read.
    Recovered,
}

/// A value read from the store, with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    /// The value.
    pub value: T,
    /// Where it came from.
    pub origin: LoadOrigin,
}

impl<T> Loaded<T> {
    /// True if the value is a default rather than stored data.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        !matches!(self.origin, LoadOrigin::Stored)
    }

    /// Discards the origin.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Reads and parses a JSON value, defaulting on absence or corruption.
pub fn load_json<S, T>(store: &S, key: &str) -> Loaded<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            return Loaded {
                value: T::default(),
                origin: LoadOrigin::Missing,
            };
        }
        Err(err) => {
            warn!(key, error = %err, "Store read failed, using default");
            return Loaded {
                value: T::default(),
                origin: LoadOrigin::Recovered,
            };
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Loaded {
            value,
            origin: LoadOrigin::Stored,
        },
        Err(err) => {
            warn!(key, error = %err, "Malformed stored value, using default");
            Loaded {
                value: T::default(),
                origin: LoadOrigin::Recovered,
            }
        }
    }
}

/// Serializes a value as JSON and writes it.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), KvError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| KvError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_defaults() {
        let store = MemoryStore::new();
        let loaded: Loaded<Vec<String>> = load_json(&store, "absent");
        assert_eq!(loaded.origin, LoadOrigin::Missing);
        assert!(loaded.is_fallback());
        assert!(loaded.value.is_empty());
    }

    #[test]
    fn test_malformed_value_recovers() {
        let store = MemoryStore::new();
        store.set("documents.invoice", "[{\"broken\": ").unwrap();

        let loaded: Loaded<Vec<String>> = load_json(&store, "documents.invoice");

        assert_eq!(loaded.origin, LoadOrigin::Recovered);
        assert!(loaded.value.is_empty());
    }

    #[test]
    fn test_round_trip_through_arc() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        save_json(&store, "names", &vec!["a".to_string(), "b".to_string()]).unwrap();

        let loaded: Loaded<Vec<String>> = load_json(&store, "names");
        assert_eq!(loaded.origin, LoadOrigin::Stored);
        assert_eq!(loaded.into_inner(), vec!["a", "b"]);
    }
}
