//! Application state shared across handlers.

use aws_config::BehaviorVersion;
use aws_config::retry::RetryConfig;
use filestore_core::config::{AppConfig, AwsConfig};
use filestore_registry::{AdminGate, Registry, RegistryResult};
use std::sync::Arc;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// File-store lifecycle engine.
    pub registry: Registry,
    /// Admin check for mutating routes.
    pub gate: AdminGate,
}

impl AppState {
    pub fn new(config: AppConfig, registry: Registry, gate: AdminGate) -> Self {
        Self {
            config: Arc::new(config),
            registry,
            gate,
        }
    }

    /// Wire every backend named in `config`.
    pub async fn from_config(config: AppConfig) -> RegistryResult<Self> {
        let sdk = load_sdk_config(&config.aws).await;

        let repo = filestore_metadata::from_config(&config.metadata, &sdk).await?;
        tracing::info!("Metadata store initialized");
        let channels = filestore_notify::from_config(&config.notify, &sdk);
        let events = filestore_registry::events::from_config(&config.events, &sdk);
        let resolver = filestore_registry::gate::resolver_from_config(&config.groups)?;

        let registry = Registry::new(repo, channels, events, config.server.project.clone());
        Ok(Self::new(config, registry, AdminGate::new(resolver)))
    }
}

/// Build the shared AWS SDK configuration.
///
/// Every AWS client uses standard retry mode with `max_attempts` total attempts.
pub async fn load_sdk_config(config: &AwsConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .retry_config(RetryConfig::standard().with_max_attempts(config.max_attempts));
    if let Some(region) = &config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    loader.load().await
}
