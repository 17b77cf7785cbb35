//! Common test utilities: a registry over SQLite with in-memory channels.

use async_trait::async_trait;
use filestore_core::{
    FileClass, FileFormat, FileStoreCreated, FileStoreDraft, Identity, Metadata, StoreType,
};
use filestore_metadata::{FileStoreRepo, SqliteStore, TenantTable};
use filestore_notify::{
    ChannelProvider, ChannelTag, MemoryBackend, NotifyError, NotifyResult, PublishPolicy,
    SubscriptionPage,
};
use filestore_registry::{EventSink, Registry, RegistryError, RegistryResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const PROJECT: &str = "PROJECT";

/// Event sink that keeps every event and can be told to fail.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<FileStoreCreated>>,
    fail: AtomicBool,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn events(&self) -> Vec<FileStoreCreated> {
        self.events.lock().unwrap().clone()
    }

    pub fn fail_next(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn emit(&self, event: &FileStoreCreated) -> RegistryResult<()> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(RegistryError::Transport("event bus unavailable".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Which error the provider should return from `delete_topic`.
#[derive(Clone, Copy, Debug)]
#[allow(dead_code)]
pub enum TeardownFailure {
    Internal,
    NotFound,
}

/// Memory channels with a call counter and optional teardown failure.
pub struct CountingProvider {
    pub inner: MemoryBackend,
    calls: AtomicUsize,
    teardown_failure: Mutex<Option<TeardownFailure>>,
}

#[allow(dead_code)]
impl CountingProvider {
    pub fn new() -> Self {
        Self {
            inner: MemoryBackend::new(),
            calls: AtomicUsize::new(0),
            teardown_failure: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_teardown(&self, failure: TeardownFailure) {
        *self.teardown_failure.lock().unwrap() = Some(failure);
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChannelProvider for CountingProvider {
    async fn create_channel(
        &self,
        name: &str,
        policy: &PublishPolicy,
        tags: &[ChannelTag],
    ) -> NotifyResult<String> {
        self.hit();
        self.inner.create_channel(name, policy, tags).await
    }

    async fn list_subscriptions(
        &self,
        channel_id: &str,
        page_token: Option<String>,
    ) -> NotifyResult<SubscriptionPage> {
        self.hit();
        self.inner.list_subscriptions(channel_id, page_token).await
    }

    async fn unsubscribe(&self, subscription_id: &str) -> NotifyResult<()> {
        self.hit();
        self.inner.unsubscribe(subscription_id).await
    }

    async fn delete_topic(&self, channel_id: &str) -> NotifyResult<()> {
        self.hit();
        let failure = *self.teardown_failure.lock().unwrap();
        match failure {
            Some(TeardownFailure::Internal) => Err(NotifyError::Internal(
                "InternalErrorException: try again".to_string(),
            )),
            Some(TeardownFailure::NotFound) => Err(NotifyError::NotFound(channel_id.to_string())),
            None => self.inner.delete_topic(channel_id).await,
        }
    }
}

/// A registry wired to test backends.
pub struct TestRegistry {
    pub registry: Registry,
    pub repo: Arc<dyn FileStoreRepo>,
    pub channels: Arc<CountingProvider>,
    pub events: Arc<RecordingSink>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestRegistry {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo: Arc<dyn FileStoreRepo> = Arc::new(
            SqliteStore::new(temp_dir.path().join("registry.db"))
                .await
                .expect("Failed to open sqlite store"),
        );
        let channels = Arc::new(CountingProvider::new());
        let events = Arc::new(RecordingSink::default());
        let registry = Registry::new(repo.clone(), channels.clone(), events.clone(), PROJECT);
        Self {
            registry,
            repo,
            channels,
            events,
            _temp_dir: temp_dir,
        }
    }

    /// Direct table access, bypassing the engine.
    pub fn table(&self, tenant: &str) -> TenantTable {
        TenantTable::new(self.repo.clone(), tenant)
    }
}

pub fn admin(tenant: &str) -> Identity {
    Identity::new(tenant, "admin-user").with_username("admin")
}

/// A valid draft for `class`.
pub fn draft(class: FileClass, name: Option<&str>) -> FileStoreDraft {
    FileStoreDraft {
        name: name.map(str::to_string),
        description: None,
        bucket: "b1".to_string(),
        folder_prefix: String::new(),
        store_type: StoreType::new(class, [FileFormat::Pxf, FileFormat::Xml]),
        access_role_arn: "arn:aws:iam::00000:role/abc".to_string(),
        metadata: Metadata::new(),
        writeable: None,
    }
}
