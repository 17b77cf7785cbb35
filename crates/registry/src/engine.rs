//! File-store lifecycle engine.

use crate::error::{RegistryError, RegistryResult};
use crate::events::EventSink;
use filestore_core::{
    FileClass, FileStore, FileStoreCreated, FileStoreDraft, FileStoreId, Identity,
};
use filestore_metadata::{FileStoreRepo, TenantTable};
use filestore_notify::{ChannelProvider, ChannelTag, PublishPolicy, channel_name};
use std::sync::Arc;
use tracing::instrument;

/// Orchestrates create, update, query and delete over the injected backends.
///
/// Holds no per-request state. Every operation reaches persistence through a
/// [`TenantTable`] bound to the caller's tenant.
#[derive(Clone)]
pub struct Registry {
    repo: Arc<dyn FileStoreRepo>,
    channels: Arc<dyn ChannelProvider>,
    events: Arc<dyn EventSink>,
    project: String,
}

impl Registry {
    pub fn new(
        repo: Arc<dyn FileStoreRepo>,
        channels: Arc<dyn ChannelProvider>,
        events: Arc<dyn EventSink>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            channels,
            events,
            project: project.into(),
        }
    }

    /// Project name used as event source and channel prefix.
    pub fn project(&self) -> &str {
        &self.project
    }

    fn table(&self, tenant: &str) -> TenantTable {
        TenantTable::new(self.repo.clone(), tenant)
    }

    /// Reject `name` if another store of the tenant already uses it.
    async fn check_name_available(&self, table: &TenantTable, name: &str) -> RegistryResult<()> {
        let existing = table.query_by_tenant().await?;
        if existing.iter().any(|s| s.name == name) {
            return Err(RegistryError::NameConflict(name.to_string()));
        }
        Ok(())
    }

    /// Reject a second store of a single-instance class.
    async fn check_class_available(
        &self,
        table: &TenantTable,
        class: FileClass,
    ) -> RegistryResult<()> {
        if class.many() {
            return Ok(());
        }
        if !table.query_by_class(class, Some(1)).await?.is_empty() {
            tracing::error!(
                file_class = %class,
                "Tenant already has a file store of this class and only one is supported"
            );
            return Err(RegistryError::Conflict(class.to_string()));
        }
        Ok(())
    }

    /// Create a store owned by the caller's tenant.
    ///
    /// The creation event is emitted before the record is persisted. A failed
    /// write after a successful emit leaves the event published.
    #[instrument(
        skip(self, identity, draft),
        fields(
            tenant_id = %identity.tenant,
            file_store_id = tracing::field::Empty,
            bucket = %draft.bucket,
            file_class = %draft.store_type.file_class,
            file_formats = ?draft.store_type.file_formats,
        )
    )]
    pub async fn create(
        &self,
        identity: &Identity,
        draft: FileStoreDraft,
    ) -> RegistryResult<FileStore> {
        draft.validate()?;

        let id = FileStoreId::new();
        tracing::Span::current().record("file_store_id", tracing::field::display(&id));
        let table = self.table(&identity.tenant);

        let mut store = FileStore::from_draft(id, identity, draft);
        self.check_name_available(&table, &store.name).await?;

        let class = store.file_class();
        if class.incoming() {
            let name = channel_name(&self.project, &store.id);
            let policy = PublishPolicy::from_bucket(&store.bucket);
            let tags = ChannelTag::for_store(&self.project, &store);
            let topic_arn = self.channels.create_channel(&name, &policy, &tags).await?;
            tracing::info!(topic_arn = %topic_arn, "Created channel for file store");
            crate::metrics::CHANNELS_CREATED.inc();
            store.topic_arn = Some(topic_arn);
        }

        self.events
            .emit(&FileStoreCreated::for_store(&self.project, &store))
            .await?;

        self.check_class_available(&table, class).await?;
        table.put(&store).await?;

        crate::metrics::STORES_CREATED.inc();
        tracing::info!("File store created");
        Ok(store)
    }

    /// Merge `draft` into an existing store.
    ///
    /// `id`, `tenant` and the file class never change. An absent name keeps
    /// the current one; a different name must be free within the tenant.
    #[instrument(
        skip(self, draft, modifier),
        fields(
            tenant_id = %tenant,
            file_store_id = %id,
            bucket = %draft.bucket,
            file_formats = ?draft.store_type.file_formats,
        )
    )]
    pub async fn update(
        &self,
        tenant: &str,
        draft: FileStoreDraft,
        id: &FileStoreId,
        modifier: &str,
    ) -> RegistryResult<FileStore> {
        let table = self.table(tenant);
        let mut store = table.get(id).await?;

        let existing_class = store.file_class();
        let requested_class = draft.store_type.file_class;
        if existing_class != requested_class {
            return Err(RegistryError::PatchError(format!(
                "Updating the file class [{existing_class}] with a new file class [{requested_class}] is not allowed"
            )));
        }

        draft.validate()?;

        store.bucket = draft.bucket;
        store.folder_prefix = draft.folder_prefix;
        store.store_type.file_formats = draft.store_type.file_formats;
        store.access_role_arn = draft.access_role_arn;
        store.metadata = draft.metadata;
        if draft.description.is_some() {
            store.description = draft.description;
        }
        if draft.writeable.is_some() {
            store.writeable = draft.writeable;
        }
        if let Some(name) = draft.name
            && name != store.name
        {
            self.check_name_available(&table, &name).await?;
            store.name = name;
        }
        store.state = store.state.after_update();
        store.modification_info.touch(modifier);

        table.patch(&store).await?;

        crate::metrics::STORES_UPDATED.inc();
        tracing::info!(state = %store.state, "File store updated");
        Ok(store)
    }

    /// Load one store.
    pub async fn get_by_id(&self, tenant: &str, id: &FileStoreId) -> RegistryResult<FileStore> {
        Ok(self.table(tenant).get(id).await?)
    }

    /// All stores of a tenant with the given class.
    pub async fn get_by_class(
        &self,
        tenant: &str,
        class: FileClass,
    ) -> RegistryResult<Vec<FileStore>> {
        Ok(self.table(tenant).query_by_class(class, None).await?)
    }

    /// Like [`Registry::get_by_class`], parsing the class from its wire name.
    pub async fn get_by_class_name(
        &self,
        tenant: &str,
        class: &str,
    ) -> RegistryResult<Vec<FileStore>> {
        let class = FileClass::parse(class)?;
        self.get_by_class(tenant, class).await
    }

    /// Every store of a tenant.
    pub async fn get_all_for_tenant(&self, tenant: &str) -> RegistryResult<Vec<FileStore>> {
        Ok(self.table(tenant).query_by_tenant().await?)
    }

    /// Stores of a tenant whose bucket is exactly `bucket`.
    ///
    /// Fails with `BucketNotFound` when none match.
    pub async fn get_by_tenant_and_bucket(
        &self,
        tenant: &str,
        bucket: &str,
    ) -> RegistryResult<Vec<FileStore>> {
        let siblings: Vec<FileStore> = self
            .get_all_for_tenant(tenant)
            .await?
            .into_iter()
            .filter(|s| s.bucket == bucket)
            .collect();
        if siblings.is_empty() {
            return Err(RegistryError::BucketNotFound(bucket.to_string()));
        }
        Ok(siblings)
    }

    /// Delete a store and tear down its channel.
    ///
    /// Channel teardown runs first. Fatal provider errors abort the delete;
    /// any other provider error is logged and the channel treated as gone.
    #[instrument(skip(self), fields(tenant_id = %tenant, file_store_id = %id))]
    pub async fn delete(&self, tenant: &str, id: &FileStoreId) -> RegistryResult<()> {
        let table = self.table(tenant);
        let store = table.get(id).await?;

        if store.file_class().incoming() || store.topic_arn.is_some() {
            match &store.topic_arn {
                Some(topic_arn) => {
                    if let Err(e) = self.channels.delete_channel(topic_arn).await {
                        if e.is_fatal() {
                            return Err(e.into());
                        }
                        crate::metrics::TEARDOWN_FAILURES_SWALLOWED.inc();
                        tracing::warn!(
                            topic_arn = %topic_arn,
                            error = %e,
                            "Deletion of channel unsuccessful; treating as already gone"
                        );
                    }
                }
                None => {
                    tracing::warn!("Incoming file store has no channel to tear down");
                }
            }
        }

        table.delete(id).await?;

        crate::metrics::STORES_DELETED.inc();
        tracing::info!("File store deleted");
        Ok(())
    }

    /// Check persistence connectivity.
    pub async fn health_check(&self) -> RegistryResult<()> {
        Ok(self.repo.health_check().await?)
    }
}
