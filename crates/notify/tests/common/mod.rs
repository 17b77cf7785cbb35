//! Common test utilities: a scripted channel provider.

use async_trait::async_trait;
use filestore_notify::{
    ChannelProvider, ChannelTag, NotifyError, NotifyResult, PublishPolicy, SubscriptionPage,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One call observed by [`ScriptedProvider`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    List(Option<String>),
    Unsubscribe(String),
    DeleteTopic(String),
}

/// Provider that serves pre-baked subscription pages and can fail on demand.
#[derive(Default)]
pub struct ScriptedProvider {
    pages: Mutex<VecDeque<SubscriptionPage>>,
    calls: Mutex<Vec<Call>>,
    fail_unsubscribe: Mutex<Option<fn() -> NotifyError>>,
    fail_delete: Mutex<Option<fn() -> NotifyError>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn with_pages(pages: Vec<SubscriptionPage>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            ..Self::default()
        }
    }

    pub fn fail_unsubscribe_with(self, f: fn() -> NotifyError) -> Self {
        *self.fail_unsubscribe.lock().unwrap() = Some(f);
        self
    }

    pub fn fail_delete_with(self, f: fn() -> NotifyError) -> Self {
        *self.fail_delete.lock().unwrap() = Some(f);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChannelProvider for ScriptedProvider {
    async fn create_channel(
        &self,
        name: &str,
        _policy: &PublishPolicy,
        _tags: &[ChannelTag],
    ) -> NotifyResult<String> {
        Ok(format!("arn:aws:sns:test:1:{name}"))
    }

    async fn list_subscriptions(
        &self,
        _channel_id: &str,
        page_token: Option<String>,
    ) -> NotifyResult<SubscriptionPage> {
        self.calls.lock().unwrap().push(Call::List(page_token));
        Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn unsubscribe(&self, subscription_id: &str) -> NotifyResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Unsubscribe(subscription_id.to_string()));
        match *self.fail_unsubscribe.lock().unwrap() {
            Some(f) => Err(f()),
            None => Ok(()),
        }
    }

    async fn delete_topic(&self, channel_id: &str) -> NotifyResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::DeleteTopic(channel_id.to_string()));
        match *self.fail_delete.lock().unwrap() {
            Some(f) => Err(f()),
            None => Ok(()),
        }
    }
}

/// A page holding `ids` with an optional continuation token.
pub fn page(ids: &[&str], next: Option<&str>) -> SubscriptionPage {
    SubscriptionPage {
        subscription_ids: ids.iter().map(|s| s.to_string()).collect(),
        next_token: next.map(str::to_string),
    }
}
