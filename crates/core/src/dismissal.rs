//! Per-client dismissal persistence.
//!
//! The durable medium is injected as a [`KeyValueStore`] (browser storage,
//! a local file, a cookie jar...). [`DismissalStore`] layers the banner
//! semantics on top: presence of a key means "dismissed", writes are
//! idempotent, and every storage failure is logged and swallowed so it can
//! never prevent a banner from rendering.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Value written under a dismissal key. Only its presence is significant.
pub const DISMISSED_MARKER: &str = "1";

/// Errors from a [`KeyValueStore`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend refused access (blocked, locked, poisoned...).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the backing medium failed.
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing medium holds unreadable data.
    #[error("Storage data is corrupt: {0}")]
    Corrupt(String),
}

/// A string-keyed, string-valued durable store scoped to one client.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// DismissalStore
// ---------------------------------------------------------------------------

/// Best-effort dismissal flags keyed by a banner's storage key.
///
/// There is no way to clear a flag: dismissal is one-way until
/// the underlying storage is wiped externally.
#[derive(Clone)]
pub struct DismissalStore {
    backend: Arc<dyn KeyValueStore>,
}

impl DismissalStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// A store backed by process memory (lost on restart).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Whether `key` has been dismissed. Storage errors read as `false`.
    pub fn has(&self, key: &str) -> bool {
        match self.backend.get(key) {
            Ok(value) => value.is_some(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Dismissal lookup failed, treating as not dismissed");
                false
            }
        }
    }

    /// Record a dismissal for `key`. Repeated calls are no-ops.
    pub fn set(&self, key: &str) {
        if self.has(key) {
            return;
        }
        if let Err(e) = self.backend.set(key, DISMISSED_MARKER) {
            tracing::warn!(key, error = %e, "Failed to persist dismissal");
        }
    }
}

impl std::fmt::Debug for DismissalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissalStore").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
