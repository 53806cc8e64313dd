use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;

use super::{DocumentStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id UUID NOT NULL,
    doc JSONB NOT NULL,
    PRIMARY KEY (collection, id)
)";

/// Postgres-backed document store: one JSONB row per document, keyed by
/// (collection, id). Queries are runtime-built so the schema stays a plain
/// key/document table.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect using DATABASE_URL and ensure the documents table exists.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&url)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        info!("Connected to document store");

        Ok(Self { pool })
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO documents (collection, id, doc) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(&doc)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn fetch(&self, collection: &str, id: Uuid) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT doc FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(match row {
            Some(row) => Some(row.try_get("doc")?),
            None => None,
        })
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let rows = sqlx::query(
            "SELECT doc FROM documents WHERE collection = $1 ORDER BY doc->>'createdAt'",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| row.try_get("doc").map_err(StoreError::from))
            .collect()
    }

    async fn replace(&self, collection: &str, id: Uuid, doc: Value) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE documents SET doc = $3 WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .bind(&doc)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "{} {} not found",
                collection, id
            )));
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!(
                "{} {} not found",
                collection, id
            )));
        }
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Value>, StoreError> {
        // Scalar equality or array membership, mirroring MemoryStore semantics
        let as_array = Value::Array(vec![value.clone()]);
        let rows = sqlx::query(
            "SELECT doc FROM documents \
             WHERE collection = $1 \
               AND (doc->$2 = $3 \
                    OR (jsonb_typeof(doc->$2) = 'array' AND doc->$2 @> $4)) \
             ORDER BY doc->>'createdAt'",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .bind(&as_array)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter()
            .map(|row| row.try_get("doc").map_err(StoreError::from))
            .collect()
    }

    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
