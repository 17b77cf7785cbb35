//! SQLite-backed file-store table.

use crate::error::{MetadataError, MetadataResult};
use crate::models::FileStoreRow;
use crate::repos::FileStoreRepo;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::instrument;

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if needed) a SQLite store and apply the schema.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // Single connection avoids "database is locked" under axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the schema. Idempotent.
    pub async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

fn is_primary_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() || db_err.message().contains("UNIQUE constraint")
        }
        _ => false,
    }
}

#[async_trait]
impl FileStoreRepo for SqliteStore {
    #[instrument(skip(self, row), fields(backend = "sqlite", tenant_id = %row.tenant_id, file_store_id = %row.store_id))]
    async fn put_file_store(&self, row: &FileStoreRow) -> MetadataResult<()> {
        let result = sqlx::query(
            "INSERT INTO file_stores (tenant_id, store_id, class, data) VALUES (?, ?, ?, ?)",
        )
        .bind(&row.tenant_id)
        .bind(&row.store_id)
        .bind(&row.class)
        .bind(&row.data)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_primary_key_violation(&e) => Err(MetadataError::AlreadyExists(format!(
                "file store {}/{}",
                row.tenant_id, row.store_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, row), fields(backend = "sqlite", tenant_id = %row.tenant_id, file_store_id = %row.store_id))]
    async fn patch_file_store(&self, row: &FileStoreRow) -> MetadataResult<()> {
        let result =
            sqlx::query("UPDATE file_stores SET data = ? WHERE tenant_id = ? AND store_id = ?")
                .bind(&row.data)
                .bind(&row.tenant_id)
                .bind(&row.store_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(MetadataError::ConditionFailed(format!(
                "file store {}/{} does not exist",
                row.tenant_id, row.store_id
            )));
        }
        Ok(())
    }

    async fn get_file_store(
        &self,
        tenant_id: &str,
        store_id: &str,
    ) -> MetadataResult<Option<FileStoreRow>> {
        let row = sqlx::query_as::<_, FileStoreRow>(
            "SELECT tenant_id, store_id, class, data FROM file_stores WHERE tenant_id = ? AND store_id = ?",
        )
        .bind(tenant_id)
        .bind(store_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn query_by_class(
        &self,
        tenant_id: &str,
        class: &str,
        limit: Option<usize>,
    ) -> MetadataResult<Vec<FileStoreRow>> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit
            .map(|l| i64::try_from(l).unwrap_or(i64::MAX))
            .unwrap_or(-1);
        let rows = sqlx::query_as::<_, FileStoreRow>(
            "SELECT tenant_id, store_id, class, data FROM file_stores WHERE tenant_id = ? AND class = ? LIMIT ?",
        )
        .bind(tenant_id)
        .bind(class)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn query_by_tenant(&self, tenant_id: &str) -> MetadataResult<Vec<FileStoreRow>> {
        let rows = sqlx::query_as::<_, FileStoreRow>(
            "SELECT tenant_id, store_id, class, data FROM file_stores WHERE tenant_id = ?",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    #[instrument(skip(self), fields(backend = "sqlite"))]
    async fn delete_file_store(&self, tenant_id: &str, store_id: &str) -> MetadataResult<()> {
        sqlx::query("DELETE FROM file_stores WHERE tenant_id = ? AND store_id = ?")
            .bind(tenant_id)
            .bind(store_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// SQL schema for SQLite.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS file_stores (
    tenant_id TEXT NOT NULL,
    store_id TEXT NOT NULL,
    class TEXT NOT NULL,
    data TEXT NOT NULL,
    PRIMARY KEY (tenant_id, store_id)
);
CREATE INDEX IF NOT EXISTS idx_file_stores_tenant_class ON file_stores(tenant_id, class);
"#;
