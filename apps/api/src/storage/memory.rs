use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StorageError, StoragePort};

/// Process-local storage. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_entry(mut self, key: &str, value: impl Into<String>) -> Self {
        self.entries
            .get_mut()
            .insert(key.to_string(), value.into());
        self
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = MemoryStorage::new().with_entry("k", "old");
        storage.set("k", "new").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("new"));
    }
}
