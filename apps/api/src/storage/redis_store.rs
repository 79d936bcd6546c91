use async_trait::async_trait;
use redis::AsyncCommands;

use super::{StorageError, StoragePort};

/// Stores blobs as plain Redis strings under `autoapply:<namespace>:<key>`.
#[derive(Clone)]
pub struct RedisStorage {
    client: redis::Client,
    prefix: String,
}

impl RedisStorage {
    pub fn new(client: redis::Client, namespace: &str) -> Self {
        Self {
            client,
            prefix: format!("autoapply:{namespace}:"),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

#[async_trait]
impl StoragePort for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(self.namespaced(key)).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set::<_, _, ()>(self.namespaced(key), value).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
