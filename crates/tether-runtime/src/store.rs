//! Persistence boundary for plugin configurations.
//!
//! The host reads a plugin's [`StoredConfig`] before install and init and
//! writes the result of install back. Where the envelopes actually live is
//! up to the [`ConfigStore`] implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tether_core::StoredConfig;
use thiserror::Error;

/// Errors raised by a [`ConfigStore`].
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The backend could not be read or written.
    #[error("config store error for '{plugin}': {reason}")]
    Backend {
        /// The plugin whose entry was accessed.
        plugin: String,
        /// Reason for failure.
        reason: String,
    },
}

impl StoreError {
    /// Creates a backend error.
    pub fn backend(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Backend {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }
}

/// Where the host keeps plugin configurations.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Loads the envelope of `plugin`, if one was saved.
    async fn load(&self, plugin: &str) -> Result<Option<StoredConfig>, StoreError>;

    /// Saves the envelope of `plugin`, replacing any previous one.
    async fn save(&self, plugin: &str, config: &StoredConfig) -> Result<(), StoreError>;
}

/// A [`ConfigStore`] kept in memory.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    entries: Mutex<HashMap<String, StoredConfig>>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the entry of `plugin`.
    pub fn with_entry(self, plugin: impl Into<String>, config: StoredConfig) -> Self {
        self.entries.lock().insert(plugin.into(), config);
        self
    }

    /// Returns a copy of the entry of `plugin`.
    pub fn get(&self, plugin: &str) -> Option<StoredConfig> {
        self.entries.lock().get(plugin).cloned()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn load(&self, plugin: &str) -> Result<Option<StoredConfig>, StoreError> {
        Ok(self.get(plugin))
    }

    async fn save(&self, plugin: &str, config: &StoredConfig) -> Result<(), StoreError> {
        self.entries.lock().insert(plugin.to_string(), config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryConfigStore::new();
        assert!(tokio_test::block_on(store.load("demo")).unwrap().is_none());

        let config = StoredConfig {
            version: 1,
            settings: json!({ "someSetting": "foo.json" }),
        };
        tokio_test::block_on(store.save("demo", &config)).unwrap();

        assert_eq!(tokio_test::block_on(store.load("demo")).unwrap(), Some(config));
        assert_eq!(store.len(), 1);
    }
}
