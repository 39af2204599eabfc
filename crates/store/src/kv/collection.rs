//! JSON arrays of records, read element by element.
//!
//! A record that fails to parse is logged and skipped on read but kept
//! verbatim, so writing the collection back never drops it. A blob that is
//! not a JSON array at all is copied to `{key}.unreadable` before the first
//! write replaces it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::error::KvError;
use super::{KeyValueStore, LoadOrigin, Loaded};

/// Suffix of the key that keeps a replaced unreadable blob.
pub const UNREADABLE_SUFFIX: &str = ".unreadable";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
enum Entry<T> {
    Parsed(T),
    Unreadable(Value),
}

/// A stored array: the records that parsed plus the ones that did not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    entries: Vec<Entry<T>>,
    #[serde(skip)]
    discarded: Option<String>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            discarded: None,
        }
    }
}

impl<T> Collection<T> {
    /// Parsed records, in stored order.
    pub fn records(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Parsed(value) => Some(value),
            Entry::Unreadable(_) => None,
        })
    }

    /// Mutable parsed records, in stored order.
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().filter_map(|entry| match entry {
            Entry::Parsed(value) => Some(value),
            Entry::Unreadable(_) => None,
        })
    }

    /// Number of parsed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records().count()
    }

    /// True if no record parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records kept verbatim because they did not parse.
    #[must_use]
    pub fn unreadable(&self) -> usize {
        self.entries.len() - self.len()
    }

    /// Appends a record.
    pub fn push(&mut self, value: T) {
        self.entries.push(Entry::Parsed(value));
    }

    /// Puts a record first.
    pub fn push_front(&mut self, value: T) {
        self.entries.insert(0, Entry::Parsed(value));
    }

    /// Keeps the parsed records matching `keep`. Unreadable records stay.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.entries.retain(|entry| match entry {
            Entry::Parsed(value) => keep(value),
            Entry::Unreadable(_) => true,
        });
    }

    /// The parsed records.
    #[must_use]
    pub fn into_values(self) -> Vec<T> {
        self.entries
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Parsed(value) => Some(value),
                Entry::Unreadable(_) => None,
            })
            .collect()
    }
}

fn parse<T: DeserializeOwned>(key: &str, raw: String) -> Loaded<Collection<T>> {
    let values: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(err) => {
            warn!(key, error = %err, "Malformed stored collection, using empty");
            return Loaded {
                value: Collection {
                    entries: Vec::new(),
                    discarded: Some(raw),
                },
                origin: LoadOrigin::Recovered,
            };
        }
    };

    let mut skipped = 0usize;
    let entries = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match T::deserialize(&value) {
            Ok(parsed) => Entry::Parsed(parsed),
            Err(err) => {
                warn!(key, index, error = %err, "Skipping unreadable stored record");
                skipped += 1;
                Entry::Unreadable(value)
            }
        })
        .collect();

    Loaded {
        value: Collection {
            entries,
            discarded: None,
        },
        origin: if skipped == 0 {
            LoadOrigin::Stored
        } else {
            LoadOrigin::Recovered
        },
    }
}

/// Reads a collection for display. Never fails.
pub fn load_collection<S, T>(store: &S, key: &str) -> Loaded<Collection<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key) {
        Ok(Some(raw)) => parse(key, raw),
        Ok(None) => Loaded {
            value: Collection::default(),
            origin: LoadOrigin::Missing,
        },
        Err(err) => {
            warn!(key, error = %err, "Store read failed, using empty collection");
            Loaded {
                value: Collection::default(),
                origin: LoadOrigin::Recovered,
            }
        }
    }
}

/// Reads a collection that is about to be written back.
///
/// # Errors
///
/// Returns an error if the backend read fails, so a write never replaces
/// data it could not see.
pub fn read_collection<S, T>(store: &S, key: &str) -> Result<Collection<T>, KvError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    Ok(match store.get(key)? {
        Some(raw) => parse(key, raw).value,
        None => Collection::default(),
    })
}

/// Writes a collection, unreadable records included.
///
/// # Errors
///
/// Returns an error if the backup of an unreadable blob, serialization or
/// the write fails.
pub fn save_collection<S, T>(
    store: &S,
    key: &str,
    collection: &Collection<T>,
) -> Result<(), KvError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    if let Some(raw) = &collection.discarded {
        let backup = format!("{key}{UNREADABLE_SUFFIX}");
        store.set(&backup, raw)?;
        warn!(key, backup = %backup, "Unreadable collection moved aside before overwrite");
    }
    super::save_json(store, key, collection)
}
