//! Tenant-scoped persistence for file-store records.
//!
//! One table keyed by `(tenant_id, store_id)` with a secondary index on
//! `(tenant_id, class)`. Each row carries the full serialized record as an
//! opaque `data` blob.
//!
//! Backends:
//! - [`SqliteStore`] for local runs and tests
//! - [`DynamoStore`] for deployments

pub mod dynamo;
pub mod error;
pub mod models;
pub mod repos;
pub mod store;

pub use dynamo::DynamoStore;
pub use error::{MetadataError, MetadataResult};
pub use models::FileStoreRow;
pub use repos::{FileStoreRepo, TenantTable};
pub use store::SqliteStore;

use filestore_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a file-store repository from configuration.
pub async fn from_config(
    config: &MetadataConfig,
    sdk: &aws_config::SdkConfig,
) -> MetadataResult<Arc<dyn FileStoreRepo>> {
    config.validate().map_err(MetadataError::Config)?;
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn FileStoreRepo>)
        }
        MetadataConfig::Dynamodb { table, class_index } => {
            tracing::info!(table = %table, class_index = %class_index, "Using DynamoDB file-store table");
            let store = DynamoStore::new(sdk, table, class_index);
            Ok(Arc::new(store) as Arc<dyn FileStoreRepo>)
        }
    }
}
