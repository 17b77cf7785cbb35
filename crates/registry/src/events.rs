//! Domain event publication.

use crate::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use aws_sdk_eventbridge::Client;
use aws_sdk_eventbridge::error::DisplayErrorContext;
use aws_sdk_eventbridge::types::PutEventsRequestEntry;
use filestore_core::FileStoreCreated;
use filestore_core::config::EventsConfig;
use std::sync::Arc;
use tracing::instrument;

/// Destination for domain events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: &FileStoreCreated) -> RegistryResult<()>;
}

/// Publishes events to an EventBridge bus.
pub struct EventBridgeSink {
    client: Client,
    bus_name: Option<String>,
}

impl std::fmt::Debug for EventBridgeSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBridgeSink")
            .field("bus_name", &self.bus_name)
            .finish_non_exhaustive()
    }
}

impl EventBridgeSink {
    pub fn new(sdk: &aws_config::SdkConfig, bus_name: Option<String>) -> Self {
        Self {
            client: Client::new(sdk),
            bus_name,
        }
    }
}

#[async_trait]
impl EventSink for EventBridgeSink {
    #[instrument(skip(self, event), fields(sink = "eventbridge", detail_type = %event.detail_type))]
    async fn emit(&self, event: &FileStoreCreated) -> RegistryResult<()> {
        let entry = PutEventsRequestEntry::builder()
            .source(&event.source)
            .detail_type(&event.detail_type)
            .detail(event.detail_json()?)
            .set_event_bus_name(self.bus_name.clone())
            .build();

        let output = self
            .client
            .put_events()
            .entries(entry)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(DisplayErrorContext(&e).to_string()))?;

        // PutEvents reports per-entry failures in a successful response.
        if let Some(failed) = output.entries().iter().find(|e| e.error_code().is_some()) {
            return Err(RegistryError::Transport(format!(
                "event rejected ({}): {}",
                failed.error_code().unwrap_or_default(),
                failed.error_message().unwrap_or_default()
            )));
        }
        Ok(())
    }
}

/// Writes events to the log and nowhere else.
#[derive(Debug, Default)]
pub struct LogEventSink;

#[async_trait]
impl EventSink for LogEventSink {
    async fn emit(&self, event: &FileStoreCreated) -> RegistryResult<()> {
        tracing::info!(
            source = %event.source,
            detail_type = %event.detail_type,
            tenant_id = %event.data.tenant_id,
            file_class = %event.data.file_class,
            topic_arn = event.data.sns_arn.as_deref().unwrap_or(""),
            "Domain event"
        );
        Ok(())
    }
}

/// Create an event sink from configuration.
pub fn from_config(config: &EventsConfig, sdk: &aws_config::SdkConfig) -> Arc<dyn EventSink> {
    match config {
        EventsConfig::Eventbridge { bus_name } => {
            Arc::new(EventBridgeSink::new(sdk, bus_name.clone()))
        }
        EventsConfig::Log => Arc::new(LogEventSink),
    }
}
