//! Channel provider trait definitions.

use crate::error::NotifyResult;
use crate::policy::PublishPolicy;
use async_trait::async_trait;
use filestore_core::{FileStore, FileStoreId};

/// A key/value tag attached to a channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelTag {
    pub key: String,
    pub value: String,
}

impl ChannelTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Tags identifying the store a channel belongs to.
    pub fn for_store(project: &str, store: &FileStore) -> Vec<ChannelTag> {
        vec![
            Self::new("project", project),
            Self::new("file_store_id", store.id.to_string()),
            Self::new("tenant_id", store.tenant.as_str()),
            Self::new("class", store.file_class().as_str()),
        ]
    }
}

/// Deterministic channel name for a store.
pub fn channel_name(project: &str, id: &FileStoreId) -> String {
    format!("{project}-{id}")
}

/// One page of subscriptions on a channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubscriptionPage {
    pub subscription_ids: Vec<String>,
    pub next_token: Option<String>,
}

/// Pub-sub channel provider.
#[async_trait]
pub trait ChannelProvider: Send + Sync {
    /// Create a channel and return its identifier.
    async fn create_channel(
        &self,
        name: &str,
        policy: &PublishPolicy,
        tags: &[ChannelTag],
    ) -> NotifyResult<String>;

    /// List one page of subscriptions.
    async fn list_subscriptions(
        &self,
        channel_id: &str,
        page_token: Option<String>,
    ) -> NotifyResult<SubscriptionPage>;

    /// Remove one subscription.
    async fn unsubscribe(&self, subscription_id: &str) -> NotifyResult<()>;

    /// Delete the channel itself, leaving subscriptions untouched.
    async fn delete_topic(&self, channel_id: &str) -> NotifyResult<()>;

    /// Remove every subscription, then delete the channel.
    ///
    /// All pages are drained before the channel is deleted. The first error
    /// aborts the sequence and is returned unchanged.
    async fn delete_channel(&self, channel_id: &str) -> NotifyResult<()> {
        let mut page_token = None;
        loop {
            let page = self.list_subscriptions(channel_id, page_token).await?;
            for subscription_id in &page.subscription_ids {
                tracing::debug!(channel_id = %channel_id, subscription_id = %subscription_id, "Unsubscribing");
                self.unsubscribe(subscription_id).await?;
            }
            match page.next_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        self.delete_topic(channel_id).await?;
        tracing::info!(channel_id = %channel_id, "Channel deleted");
        Ok(())
    }
}
