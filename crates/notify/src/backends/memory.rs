//! In-process channel provider.

use crate::error::{NotifyError, NotifyResult};
use crate::policy::PublishPolicy;
use crate::traits::{ChannelProvider, ChannelTag, SubscriptionPage};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::Mutex;

const DEFAULT_PAGE_SIZE: usize = 100;

/// A channel held by [`MemoryBackend`].
#[derive(Clone, Debug)]
pub struct MemoryChannel {
    pub name: String,
    pub policy: PublishPolicy,
    pub tags: Vec<ChannelTag>,
    pub subscriptions: BTreeSet<String>,
}

#[derive(Default)]
struct Inner {
    channels: BTreeMap<String, MemoryChannel>,
    /// subscription id -> channel id
    subscriptions: BTreeMap<String, String>,
}

/// Channels kept in process memory, with ARN-shaped identifiers.
pub struct MemoryBackend {
    region: String,
    account: String,
    page_size: usize,
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("region", &self.region)
            .field("account", &self.account)
            .finish_non_exhaustive()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            region: "local".to_string(),
            account: "000000000000".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Use a smaller subscription page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn lock(&self) -> NotifyResult<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| NotifyError::Internal("memory channel state poisoned".to_string()))
    }

    /// Add a subscription to a channel and return its identifier.
    pub fn subscribe(&self, channel_id: &str, endpoint: &str) -> NotifyResult<String> {
        let mut inner = self.lock()?;
        let channel = inner
            .channels
            .get_mut(channel_id)
            .ok_or_else(|| NotifyError::NotFound(channel_id.to_string()))?;
        let subscription_id = format!("{channel_id}:{}", uuid::Uuid::new_v4());
        channel.subscriptions.insert(subscription_id.clone());
        tracing::debug!(channel_id = %channel_id, endpoint = %endpoint, "Subscribed");
        inner
            .subscriptions
            .insert(subscription_id.clone(), channel_id.to_string());
        Ok(subscription_id)
    }

    /// Look up a channel.
    pub fn channel(&self, channel_id: &str) -> Option<MemoryChannel> {
        self.lock()
            .ok()
            .and_then(|inner| inner.channels.get(channel_id).cloned())
    }

    /// Number of live channels.
    pub fn channel_count(&self) -> usize {
        self.lock().map(|inner| inner.channels.len()).unwrap_or(0)
    }

    /// Number of live subscriptions across all channels.
    pub fn subscription_count(&self) -> usize {
        self.lock()
            .map(|inner| inner.subscriptions.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl ChannelProvider for MemoryBackend {
    async fn create_channel(
        &self,
        name: &str,
        policy: &PublishPolicy,
        tags: &[ChannelTag],
    ) -> NotifyResult<String> {
        let channel_id = format!("arn:aws:sns:{}:{}:{name}", self.region, self.account);
        let mut inner = self.lock()?;
        // Creating an existing name returns the existing channel.
        inner
            .channels
            .entry(channel_id.clone())
            .or_insert_with(|| MemoryChannel {
                name: name.to_string(),
                policy: policy.clone(),
                tags: tags.to_vec(),
                subscriptions: BTreeSet::new(),
            });
        Ok(channel_id)
    }

    async fn list_subscriptions(
        &self,
        channel_id: &str,
        page_token: Option<String>,
    ) -> NotifyResult<SubscriptionPage> {
        let inner = self.lock()?;
        let channel = inner
            .channels
            .get(channel_id)
            .ok_or_else(|| NotifyError::NotFound(channel_id.to_string()))?;

        // The token is the last id already returned; listing resumes strictly
        // after it, so removals between pages never skip entries.
        let lower = match &page_token {
            Some(token) => Bound::Excluded(token.as_str()),
            None => Bound::Unbounded,
        };
        let mut remaining = channel
            .subscriptions
            .range::<str, _>((lower, Bound::Unbounded))
            .cloned();
        let subscription_ids: Vec<String> = remaining.by_ref().take(self.page_size).collect();
        let next_token = match (remaining.next(), subscription_ids.last()) {
            (Some(_), Some(last)) => Some(last.clone()),
            _ => None,
        };

        Ok(SubscriptionPage {
            subscription_ids,
            next_token,
        })
    }

    async fn unsubscribe(&self, subscription_id: &str) -> NotifyResult<()> {
        let mut inner = self.lock()?;
        let Some(channel_id) = inner.subscriptions.remove(subscription_id) else {
            return Err(NotifyError::NotFound(subscription_id.to_string()));
        };
        if let Some(channel) = inner.channels.get_mut(&channel_id) {
            channel.subscriptions.remove(subscription_id);
        }
        Ok(())
    }

    async fn delete_topic(&self, channel_id: &str) -> NotifyResult<()> {
        let mut inner = self.lock()?;
        let Some(channel) = inner.channels.remove(channel_id) else {
            return Err(NotifyError::NotFound(channel_id.to_string()));
        };
        // Subscriptions left on a deleted channel go with it.
        for subscription_id in &channel.subscriptions {
            inner.subscriptions.remove(subscription_id);
        }
        Ok(())
    }
}
