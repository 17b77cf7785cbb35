//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Project name. Used as the event source and the channel name prefix.
    #[serde(default = "default_project")]
    pub project: String,
    /// Name of the environment being deployed (e.g. "prod", "dev").
    #[serde(default = "default_deployment_environment")]
    pub deployment_environment: String,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_project() -> String {
    "file-store-manager".to_string()
}

fn default_deployment_environment() -> String {
    "prod".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            project: default_project(),
            deployment_environment: default_deployment_environment(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

impl ServerConfig {
    /// Validate server configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.project.trim().is_empty() {
            return Err("server.project must not be empty".to_string());
        }
        Ok(())
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database (local runs and tests).
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// DynamoDB table.
    Dynamodb {
        /// Table name.
        table: String,
        /// Name of the local secondary index keyed on class.
        #[serde(default = "default_class_index")]
        class_index: String,
    },
}

fn default_class_index() -> String {
    "LSI-1".to_string()
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/file-stores.db"),
        }
    }
}

impl MetadataConfig {
    /// Validate metadata configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MetadataConfig::Sqlite { .. } => Ok(()),
            MetadataConfig::Dynamodb { table, class_index } => {
                if table.trim().is_empty() {
                    return Err("dynamodb metadata config requires 'table'".to_string());
                }
                if class_index.trim().is_empty() {
                    return Err("dynamodb metadata config requires 'class_index'".to_string());
                }
                Ok(())
            }
        }
    }
}

/// Notification-channel provider configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NotifyConfig {
    /// Amazon SNS topics.
    Sns,
    /// In-process channels. Nothing leaves the process.
    #[default]
    Memory,
}

/// Domain event sink configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventsConfig {
    /// Amazon EventBridge.
    Eventbridge {
        /// Event bus name. Uses the account's default bus when unset.
        bus_name: Option<String>,
    },
    /// Write events to the log only.
    #[default]
    Log,
}

/// Group resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GroupsConfig {
    /// User-management service over HTTP.
    Http {
        /// Base URL (e.g. "https://users.internal").
        base_url: String,
        /// Request timeout in seconds.
        #[serde(default = "default_groups_timeout_secs")]
        timeout_secs: u64,
    },
    /// Fixed admin list. Every listed user is an admin in every tenant.
    Static {
        #[serde(default)]
        admins: Vec<String>,
    },
}

fn default_groups_timeout_secs() -> u64 {
    10
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self::Static { admins: Vec::new() }
    }
}

impl GroupsConfig {
    /// Validate group resolver configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            GroupsConfig::Http {
                base_url,
                timeout_secs,
            } => {
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(format!(
                        "groups.base_url must be an http(s) URL, got '{base_url}'"
                    ));
                }
                if *timeout_secs == 0 {
                    return Err("groups.timeout_secs cannot be 0".to_string());
                }
                Ok(())
            }
            GroupsConfig::Static { .. } => Ok(()),
        }
    }
}

/// Shared AWS client settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AwsConfig {
    /// AWS region. Falls back to the SDK's default provider chain when unset.
    pub region: Option<String>,
    /// Optional endpoint URL (for LocalStack, etc.).
    pub endpoint: Option<String>,
    /// Total attempts per call, including the first, under standard retry mode.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    4
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            max_attempts: default_max_attempts(),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub groups: GroupsConfig,
    #[serde(default)]
    pub aws: AwsConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses SQLite metadata, in-memory channels, log
    /// events and a static admin list.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig {
                project: "PROJECT".to_string(),
                deployment_environment: "test".to_string(),
                ..ServerConfig::default()
            },
            groups: GroupsConfig::Static {
                admins: vec!["admin-user".to_string()],
            },
            ..Self::default()
        }
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), String> {
        self.server.validate()?;
        self.metadata.validate()?;
        self.groups.validate()?;
        if self.aws.max_attempts == 0 {
            return Err("aws.max_attempts cannot be 0".to_string());
        }
        Ok(())
    }
}
