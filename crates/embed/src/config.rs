use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cta_core::dismissal::DismissalStore;

use crate::error::EmbedError;
use crate::file_store::FileStore;

/// Embed runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Base URL of the banner API including the version prefix.
    pub api_url: String,
    /// Per-request timeout for API calls, in seconds.
    pub request_timeout_secs: u64,
    /// File backing the dismissal store. `None` keeps dismissals in memory.
    pub dismissal_store_path: Option<PathBuf>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api/v1".into(),
            request_timeout_secs: 10,
            dismissal_store_path: None,
        }
    }
}

impl EmbedConfig {
    /// Load configuration from the environment (and `.env`, if present).
    ///
    /// | Env Var                    | Default                          |
    /// |----------------------------|----------------------------------|
    /// | `CTA_API_URL`              | `http://localhost:3000/api/v1`   |
    /// | `CTA_REQUEST_TIMEOUT_SECS` | `10`                             |
    /// | `CTA_DISMISSAL_STORE`      | unset (in-memory dismissals)     |
    pub fn from_env() -> Result<Self, EmbedError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EmbedError> {
        let defaults = Self::default();

        let api_url = lookup("CTA_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_url);

        let request_timeout_secs = match lookup("CTA_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                EmbedError::Config(format!(
                    "CTA_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                ))
            })?,
            None => defaults.request_timeout_secs,
        };

        let dismissal_store_path = lookup("CTA_DISMISSAL_STORE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_url,
            request_timeout_secs,
            dismissal_store_path,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Build the dismissal store this configuration names.
    pub fn dismissal_store(&self) -> DismissalStore {
        match &self.dismissal_store_path {
            Some(path) => DismissalStore::new(Arc::new(FileStore::new(path.clone()))),
            None => DismissalStore::in_memory(),
        }
    }
}
