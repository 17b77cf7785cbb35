//! File-store repository trait.

use crate::error::MetadataResult;
use crate::models::FileStoreRow;
use async_trait::async_trait;

/// Key-value table of file stores keyed by `(tenant_id, store_id)`.
///
/// Backends take the tenant from their arguments. Callers outside this crate
/// reach a repo through [`crate::TenantTable`], which pins the tenant.
#[async_trait]
pub trait FileStoreRepo: Send + Sync {
    /// Insert a row if no row exists for its key.
    ///
    /// Fails with `AlreadyExists` when the key is taken.
    async fn put_file_store(&self, row: &FileStoreRow) -> MetadataResult<()>;

    /// Overwrite the payload of an existing row.
    ///
    /// Fails with `ConditionFailed` when the key does not exist.
    async fn patch_file_store(&self, row: &FileStoreRow) -> MetadataResult<()>;

    /// Get a row by key.
    async fn get_file_store(
        &self,
        tenant_id: &str,
        store_id: &str,
    ) -> MetadataResult<Option<FileStoreRow>>;

    /// Get a tenant's rows for one class, optionally capped.
    async fn query_by_class(
        &self,
        tenant_id: &str,
        class: &str,
        limit: Option<usize>,
    ) -> MetadataResult<Vec<FileStoreRow>>;

    /// Get all rows for a tenant.
    async fn query_by_tenant(&self, tenant_id: &str) -> MetadataResult<Vec<FileStoreRow>>;

    /// Remove a row. Removing an absent key succeeds.
    async fn delete_file_store(&self, tenant_id: &str, store_id: &str) -> MetadataResult<()>;

    /// Check backend connectivity.
    async fn health_check(&self) -> MetadataResult<()>;
}
