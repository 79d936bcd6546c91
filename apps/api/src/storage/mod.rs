//! Persistence adapter: a small key-value port plus the backends that implement it.
//!
//! The store only ever reads and writes two keys ([`PROFILE_KEY`], [`APPLICATIONS_KEY`]),
//! each holding a JSON snapshot. Backends are scoped to a namespace (one per user/session)
//! at construction, so callers never see namespaced keys.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::db::create_pool;

pub mod file;
pub mod memory;
pub mod postgres;
pub mod redis_store;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use postgres::PgStorage;
pub use redis_store::RedisStorage;

pub const PROFILE_KEY: &str = "autoapply_userProfile";
pub const APPLICATIONS_KEY: &str = "autoapply_trackedApplications";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Durable key-value storage for serialized snapshots.
///
/// Implement this to swap backends without touching the store.
/// Carried by the store as `Arc<dyn StoragePort>`.
#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Returns the stored blob, or `None` if the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the blob stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Short backend name for logs ("memory", "file", ...).
    fn backend_name(&self) -> &'static str;
}

/// Builds the storage backend selected by `STORAGE_BACKEND`.
pub async fn build_storage(config: &Config) -> Result<Arc<dyn StoragePort>> {
    let namespace = config.storage_namespace.as_str();

    let storage: Arc<dyn StoragePort> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        StorageBackend::File => Arc::new(
            FileStorage::open(config.data_dir.join(namespace))
                .await
                .context("Failed to open file storage")?,
        ),
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL must be set when STORAGE_BACKEND=redis")?;
            let client = redis::Client::open(url)?;
            Arc::new(RedisStorage::new(client, namespace))
        }
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set when STORAGE_BACKEND=postgres")?;
            let pool = create_pool(url).await?;
            let storage = PgStorage::new(pool, namespace);
            storage.ensure_schema().await?;
            Arc::new(storage)
        }
    };

    info!(
        "Storage backend '{}' ready (namespace: {namespace})",
        storage.backend_name()
    );
    Ok(storage)
}
