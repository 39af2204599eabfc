//! File-backed key-value store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{KeyValueStore, KvError};

/// Stores each key as `{key}.json` under a directory.
///
/// Writes go to a temporary file that is renamed over the target, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, KvError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| KvError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// Root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.root.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(KvError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let target = self.path_for(key);
        let staging = self
            .root
            .join(format!(".{}.tmp", Uuid::new_v4().simple()));
        let to_error = |source| KvError::Io {
            key: key.to_string(),
            source,
        };

        fs::write(&staging, value.as_bytes()).map_err(to_error)?;
        if let Err(source) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(to_error(source));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(KvError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let store = FileStore::open(dir.path().join("data")).unwrap();
        store.set("numbering.counters", "{\"invoice\":1}").unwrap();

        let reopened = FileStore::open(dir.path().join("data")).unwrap();
        assert_eq!(
            reopened.get("numbering.counters").unwrap().as_deref(),
            Some("{\"invoice\":1}")
        );
        assert!(dir.path().join("data/numbering.counters.json").exists());
    }

    #[test]
    fn test_absent_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("documents.quote").unwrap(), None);
        store.remove("documents.quote").unwrap();
    }

    #[test]
    fn test_overwrite_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("company.profile", "{\"a\":1}").unwrap();
        store.set("company.profile", "{\"a\":2}").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["company.profile.json"]);
        assert_eq!(
            store.get("company.profile").unwrap().as_deref(),
            Some("{\"a\":2}")
        );
    }

    #[test]
    fn test_separators_in_keys_stay_inside_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("../escape", "1").unwrap();
        assert!(dir.path().join(".._escape.json").exists());
    }
}
