//! Company profile persistence.

use tracing::info;

use docket_core::profile::CompanyProfile;

use crate::error::StoreError;
use crate::kv::{KeyValueStore, Loaded, load_json, save_json};

/// Storage key for the company profile.
pub const PROFILE_KEY: &str = "company.profile";

/// Reads and writes the single [`CompanyProfile`].
#[derive(Debug)]
pub struct CompanyRepository<S> {
    kv: S,
}

impl<S: KeyValueStore> CompanyRepository<S> {
    /// Creates a repository over a key-value backend.
    #[must_use]
    pub const fn new(kv: S) -> Self {
        Self { kv }
    }

    /// The stored profile, or an empty one.
    #[must_use]
    pub fn load(&self) -> Loaded<CompanyProfile> {
        load_json(&self.kv, PROFILE_KEY)
    }

    /// The stored profile, discarding where it came from.
    #[must_use]
    pub fn profile(&self) -> CompanyProfile {
        self.load().into_inner()
    }

    /// Replaces the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn save(&self, profile: &CompanyProfile) -> Result<(), StoreError> {
        save_json(&self.kv, PROFILE_KEY, profile)?;
        info!(company = %profile.company.name, "Company profile saved");
        Ok(())
    }
}
