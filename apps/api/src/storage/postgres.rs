use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use super::{StorageError, StoragePort};

/// Stores blobs in a single `kv_blobs` table keyed by (namespace, key).
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
    namespace: String,
}

impl PgStorage {
    pub fn new(pool: PgPool, namespace: &str) -> Self {
        Self {
            pool,
            namespace: namespace.to_string(),
        }
    }

    /// Creates the backing table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_blobs (
                namespace  TEXT        NOT NULL,
                key        TEXT        NOT NULL,
                value      TEXT        NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                PRIMARY KEY (namespace, key)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("kv_blobs table ready");
        Ok(())
    }
}

#[async_trait]
impl StoragePort for PgStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(sqlx::query_scalar::<_, String>(
            "SELECT value FROM kv_blobs WHERE namespace = $1 AND key = $2",
        )
        .bind(&self.namespace)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO kv_blobs (namespace, key, value, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (namespace, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&self.namespace)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
