//! Common test utilities and fixtures.

use filestore_core::{
    FileClass, FileFormat, FileStore, FileStoreDraft, FileStoreId, Identity, Metadata, StoreType,
};
use filestore_metadata::{FileStoreRepo, MetadataResult, SqliteStore, TenantTable};
use std::sync::Arc;
use tempfile::TempDir;

/// A SQLite-backed repo that cleans up on drop.
pub struct TestMetadata {
    pub repo: Arc<dyn FileStoreRepo>,
    _temp_dir: TempDir,
}

impl TestMetadata {
    pub async fn new() -> MetadataResult<Self> {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let store = SqliteStore::new(temp_dir.path().join("test.db")).await?;
        Ok(Self {
            repo: Arc::new(store),
            _temp_dir: temp_dir,
        })
    }

    /// A table handle bound to `tenant`.
    pub fn table(&self, tenant: &str) -> TenantTable {
        TenantTable::new(self.repo.clone(), tenant)
    }
}

/// Build a store owned by `tenant` with the given class and name.
#[allow(dead_code)]
pub fn sample_store(tenant: &str, class: FileClass, name: &str) -> FileStore {
    let identity = Identity::new(tenant, "user-1");
    let draft = FileStoreDraft {
        name: Some(name.to_string()),
        description: None,
        bucket: "testcustomerpxfbucket".to_string(),
        folder_prefix: String::new(),
        store_type: StoreType::new(class, [FileFormat::Pxf, FileFormat::Xml]),
        access_role_arn: "arn:aws:iam::00000:role/abc".to_string(),
        metadata: Metadata::new(),
        writeable: None,
    };
    FileStore::from_draft(FileStoreId::new(), &identity, draft)
}
