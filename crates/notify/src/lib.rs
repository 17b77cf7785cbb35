//! Notification channels for incoming file stores.
//!
//! Each store whose class is `incoming` gets a pub-sub channel that its
//! bucket may publish to. This crate provides:
//! - The [`ChannelProvider`] seam and its teardown sequence
//! - The publish policy document
//! - Backends: SNS and in-memory

pub mod backends;
pub mod error;
pub mod policy;
pub mod traits;

pub use backends::{memory::MemoryBackend, sns::SnsBackend};
pub use error::{NotifyError, NotifyResult};
pub use policy::PublishPolicy;
pub use traits::{ChannelProvider, ChannelTag, SubscriptionPage, channel_name};

use filestore_core::config::NotifyConfig;
use std::sync::Arc;

/// Create a channel provider from configuration.
pub fn from_config(config: &NotifyConfig, sdk: &aws_config::SdkConfig) -> Arc<dyn ChannelProvider> {
    match config {
        NotifyConfig::Sns => Arc::new(SnsBackend::new(sdk)),
        NotifyConfig::Memory => {
            tracing::warn!("Using in-memory notification channels; nothing is published");
            Arc::new(MemoryBackend::new())
        }
    }
}
