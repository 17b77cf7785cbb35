//! Domain events published by the registry.

use crate::file_class::FileClass;
use crate::file_store::FileStore;
use serde::{Deserialize, Serialize};

/// Detail type of the creation event.
pub const FILE_STORE_CREATED: &str = "FileStoreCreated";

/// Announces that a file store was created.
///
/// Emitted before the record is persisted, so consumers may observe an event
/// for a store whose write later failed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStoreCreated {
    pub source: String,
    pub detail_type: String,
    pub data: FileStoreCreatedData,
}

/// Event payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStoreCreatedData {
    pub identity: String,
    pub correlation_id: String,
    pub tenant_id: String,
    pub sns_arn: Option<String>,
    pub file_class: FileClass,
}

impl FileStoreCreated {
    /// Build the event for a freshly materialized store.
    pub fn for_store(source: &str, store: &FileStore) -> Self {
        Self {
            source: source.to_string(),
            detail_type: FILE_STORE_CREATED.to_string(),
            data: FileStoreCreatedData {
                identity: String::new(),
                correlation_id: String::new(),
                tenant_id: store.tenant.clone(),
                sns_arn: store.topic_arn.clone(),
                file_class: store.file_class(),
            },
        }
    }

    /// Serialize the `data` payload as the event detail document.
    pub fn detail_json(&self) -> crate::Result<String> {
        serde_json::to_string(&self.data).map_err(|e| crate::Error::Serialization(e.to_string()))
    }
}
