//! Tenant-restricted view over a [`FileStoreRepo`].

use crate::error::{MetadataError, MetadataResult};
use crate::models::FileStoreRow;
use crate::repos::FileStoreRepo;
use filestore_core::{FileClass, FileStore, FileStoreId};
use std::sync::Arc;

/// A table handle bound to one tenant.
///
/// Reads are keyed by the bound tenant. Writes whose record belongs to a
/// different tenant are rejected before they reach the backend.
#[derive(Clone)]
pub struct TenantTable {
    repo: Arc<dyn FileStoreRepo>,
    tenant: String,
}

impl std::fmt::Debug for TenantTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantTable")
            .field("tenant", &self.tenant)
            .finish_non_exhaustive()
    }
}

impl TenantTable {
    pub fn new(repo: Arc<dyn FileStoreRepo>, tenant: impl Into<String>) -> Self {
        Self {
            repo,
            tenant: tenant.into(),
        }
    }

    /// The tenant this table is bound to.
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    fn row_for(&self, store: &FileStore) -> MetadataResult<FileStoreRow> {
        if store.tenant != self.tenant {
            return Err(MetadataError::TenantMismatch {
                expected: self.tenant.clone(),
                actual: store.tenant.clone(),
            });
        }
        FileStoreRow::from_store(store)
    }

    /// Insert a new record. Fails with `AlreadyExists` if the id is taken.
    pub async fn put(&self, store: &FileStore) -> MetadataResult<()> {
        let row = self.row_for(store)?;
        self.repo.put_file_store(&row).await
    }

    /// Overwrite an existing record.
    pub async fn patch(&self, store: &FileStore) -> MetadataResult<()> {
        let row = self.row_for(store)?;
        self.repo.patch_file_store(&row).await
    }

    /// Load a record, failing with `NotFound` when absent.
    pub async fn get(&self, id: &FileStoreId) -> MetadataResult<FileStore> {
        let store_id = id.to_string();
        let row = self
            .repo
            .get_file_store(&self.tenant, &store_id)
            .await?
            .ok_or_else(|| MetadataError::NotFound(format!("file store {store_id}")))?;
        row.to_store()
    }

    /// All records of one class, optionally capped.
    pub async fn query_by_class(
        &self,
        class: FileClass,
        limit: Option<usize>,
    ) -> MetadataResult<Vec<FileStore>> {
        let rows = self
            .repo
            .query_by_class(&self.tenant, class.as_str(), limit)
            .await?;
        rows.iter().map(FileStoreRow::to_store).collect()
    }

    /// Every record owned by the tenant.
    pub async fn query_by_tenant(&self) -> MetadataResult<Vec<FileStore>> {
        let rows = self.repo.query_by_tenant(&self.tenant).await?;
        rows.iter().map(FileStoreRow::to_store).collect()
    }

    /// Remove a record. Absent records are not an error.
    pub async fn delete(&self, id: &FileStoreId) -> MetadataResult<()> {
        self.repo
            .delete_file_store(&self.tenant, &id.to_string())
            .await
    }
}
