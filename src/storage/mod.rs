//! Local key/value persistence
//!
//! Every piece of shopper state lives under its own key and is read once at
//! startup, then written back on each mutation. Backends only need to store
//! strings; callers own the encoding.

use std::fmt::Display;

use crate::error::AppResult;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    ApiKey,
    Points,
    Streak,
    Cart,
    Address,
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKey::ApiKey => write!(f, "moodbuy_api_key"),
            StorageKey::Points => write!(f, "moodbuy_points"),
            StorageKey::Streak => write!(f, "moodbuy_streak"),
            StorageKey::Cart => write!(f, "moodbuy_cart"),
            StorageKey::Address => write!(f, "moodbuy_address"),
        }
    }
}

/// String storage keyed by [`StorageKey`]
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when the key was never written
    fn get(&self, key: StorageKey) -> AppResult<Option<String>>;

    fn set(&self, key: StorageKey, value: &str) -> AppResult<()>;

    fn remove(&self, key: StorageKey) -> AppResult<()>;
}

/// Writes a value, logging instead of failing.
///
/// Local persistence is best effort; the in-memory state stays authoritative
/// for the running session.
pub(crate) fn persist(store: &dyn KeyValueStore, key: StorageKey, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key = %key, error = %e, "Failed to persist local state");
    }
}
