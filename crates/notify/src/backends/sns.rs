//! Amazon SNS channel provider.

use crate::error::{NotifyError, NotifyResult};
use crate::policy::PublishPolicy;
use crate::traits::{ChannelProvider, ChannelTag, SubscriptionPage};
use async_trait::async_trait;
use aws_sdk_sns::Client;
use aws_sdk_sns::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sns::types::Tag;
use tracing::instrument;

fn map_sns_error<E>(err: SdkError<E>) -> NotifyError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let Some(service_err) = err.as_service_error() else {
        return NotifyError::Transport(DisplayErrorContext(&err).to_string());
    };

    let code = service_err.code().unwrap_or("Unknown").to_string();
    let message = service_err.message().unwrap_or_default().to_string();
    match code.as_str() {
        "InternalError" | "InternalErrorException" | "InternalFailure" => {
            NotifyError::Internal(format!("{code}: {message}"))
        }
        "NotFound" | "NotFoundException" => NotifyError::NotFound(message),
        _ => NotifyError::Rejected { code, message },
    }
}

/// Channels backed by SNS topics.
pub struct SnsBackend {
    client: Client,
}

impl std::fmt::Debug for SnsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnsBackend").finish_non_exhaustive()
    }
}

impl SnsBackend {
    pub fn new(sdk: &aws_config::SdkConfig) -> Self {
        Self::from_client(Client::new(sdk))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChannelProvider for SnsBackend {
    #[instrument(skip(self, policy, tags), fields(backend = "sns"))]
    async fn create_channel(
        &self,
        name: &str,
        policy: &PublishPolicy,
        tags: &[ChannelTag],
    ) -> NotifyResult<String> {
        let tags = tags
            .iter()
            .map(|t| {
                Tag::builder()
                    .key(&t.key)
                    .value(&t.value)
                    .build()
                    .map_err(|e| NotifyError::Rejected {
                        code: "InvalidTag".to_string(),
                        message: e.to_string(),
                    })
            })
            .collect::<NotifyResult<Vec<_>>>()?;

        let output = self
            .client
            .create_topic()
            .name(name)
            .attributes("Policy", policy.to_document())
            .set_tags(Some(tags))
            .send()
            .await
            .map_err(map_sns_error)?;

        let topic_arn = output
            .topic_arn()
            .ok_or_else(|| NotifyError::Transport("create_topic returned no TopicArn".to_string()))?
            .to_string();
        tracing::info!(topic_arn = %topic_arn, "Created topic");
        Ok(topic_arn)
    }

    #[instrument(skip(self), fields(backend = "sns"))]
    async fn list_subscriptions(
        &self,
        channel_id: &str,
        page_token: Option<String>,
    ) -> NotifyResult<SubscriptionPage> {
        let output = self
            .client
            .list_subscriptions_by_topic()
            .topic_arn(channel_id)
            .set_next_token(page_token)
            .send()
            .await
            .map_err(map_sns_error)?;

        let subscription_ids = output
            .subscriptions()
            .iter()
            .filter_map(|s| s.subscription_arn())
            // Unconfirmed subscriptions have no ARN yet and cannot be removed.
            .filter(|arn| *arn != "PendingConfirmation")
            .map(str::to_string)
            .collect();

        Ok(SubscriptionPage {
            subscription_ids,
            next_token: output.next_token().map(str::to_string),
        })
    }

    #[instrument(skip(self), fields(backend = "sns"))]
    async fn unsubscribe(&self, subscription_id: &str) -> NotifyResult<()> {
        self.client
            .unsubscribe()
            .subscription_arn(subscription_id)
            .send()
            .await
            .map_err(map_sns_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "sns"))]
    async fn delete_topic(&self, channel_id: &str) -> NotifyResult<()> {
        self.client
            .delete_topic()
            .topic_arn(channel_id)
            .send()
            .await
            .map_err(map_sns_error)?;
        Ok(())
    }
}
