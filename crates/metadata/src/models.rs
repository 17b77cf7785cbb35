//! Persisted record shape.

use filestore_core::FileStore;
use sqlx::FromRow;

/// One persisted file store.
///
/// `tenant_id` and `store_id` form the primary key and `class` is indexed
/// together with `tenant_id`. `data` is the full serialized [`FileStore`].
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileStoreRow {
    pub tenant_id: String,
    pub store_id: String,
    pub class: String,
    pub data: String,
}

impl FileStoreRow {
    /// Build the row for a domain record.
    pub fn from_store(store: &FileStore) -> crate::MetadataResult<Self> {
        Ok(Self {
            tenant_id: store.tenant.clone(),
            store_id: store.id.to_string(),
            class: store.file_class().as_str().to_string(),
            data: store.to_json()?,
        })
    }

    /// Decode the `data` blob.
    pub fn to_store(&self) -> crate::MetadataResult<FileStore> {
        FileStore::from_json(&self.data).map_err(|e| {
            crate::MetadataError::Serialization(format!(
                "corrupt record {}/{}: {e}",
                self.tenant_id, self.store_id
            ))
        })
    }
}
