//! File-store aggregate and its value objects.

use crate::file_class::{FileClass, FileFormat};
use crate::identity::Identity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

/// Free-form metadata attached to a store.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Unique identifier for a file store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileStoreId(Uuid);

impl FileStoreId {
    /// Generate a new random file-store ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from a string.
    pub fn parse(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| crate::Error::InvalidFileStoreId(format!("{s}: {e}")))
    }
}

impl Default for FileStoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for FileStoreId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Debug for FileStoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileStoreId({})", self.0)
    }
}

impl fmt::Display for FileStoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deployment state of a file store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileStoreState {
    /// Created or modified; downstream provisioning has not caught up yet.
    DeploymentPending,
    /// Provisioned and serving.
    Active,
    /// Provisioning failed.
    Error,
    /// State could not be determined.
    Unknown,
}

impl FileStoreState {
    /// State a store moves to after a successful update.
    ///
    /// Known states go back to pending redeployment; anything else is unknown.
    pub fn after_update(self) -> Self {
        match self {
            Self::Active | Self::Error | Self::DeploymentPending => Self::DeploymentPending,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Get the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeploymentPending => "DEPLOYMENT_PENDING",
            Self::Active => "ACTIVE",
            Self::Error => "ERROR",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FileStoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// File class plus the formats a store accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreType {
    pub file_class: FileClass,
    #[serde(default)]
    pub file_formats: BTreeSet<FileFormat>,
}

impl StoreType {
    pub fn new(file_class: FileClass, file_formats: impl IntoIterator<Item = FileFormat>) -> Self {
        Self {
            file_class,
            file_formats: file_formats.into_iter().collect(),
        }
    }
}

/// Who created and last modified a store, and when.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModificationInfo {
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub last_modified: OffsetDateTime,
    pub last_modified_by: String,
}

impl ModificationInfo {
    /// Stamp both the created and last-modified fields.
    pub fn created_now(user_id: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            created: now,
            created_by: user_id.to_string(),
            last_modified: now,
            last_modified_by: user_id.to_string(),
        }
    }

    /// Stamp the last-modified fields.
    pub fn touch(&mut self, user_id: &str) {
        self.last_modified = OffsetDateTime::now_utc();
        self.last_modified_by = user_id.to_string();
    }
}

/// A tenant-owned binding of a bucket/prefix to a file class and formats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStore {
    pub id: FileStoreId,
    pub tenant: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub bucket: String,
    #[serde(default)]
    pub folder_prefix: String,
    pub store_type: StoreType,
    pub access_role_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_arn: Option<String>,
    pub state: FileStoreState,
    pub modification_info: ModificationInfo,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writeable: Option<bool>,
}

impl FileStore {
    /// Materialize a new store from a caller draft.
    ///
    /// The tenant comes from the caller identity, never from the payload. A
    /// missing name defaults to `<FILE_CLASS>-<id>`.
    pub fn from_draft(id: FileStoreId, identity: &Identity, draft: FileStoreDraft) -> Self {
        let name = draft
            .name
            .unwrap_or_else(|| format!("{}-{}", draft.store_type.file_class, id));
        Self {
            id,
            tenant: identity.tenant.clone(),
            name,
            description: draft.description,
            bucket: draft.bucket,
            folder_prefix: draft.folder_prefix,
            store_type: draft.store_type,
            access_role_arn: draft.access_role_arn,
            topic_arn: None,
            state: FileStoreState::DeploymentPending,
            modification_info: ModificationInfo::created_now(&identity.user_id),
            metadata: draft.metadata,
            writeable: draft.writeable,
        }
    }

    /// The store's file class.
    pub fn file_class(&self) -> FileClass {
        self.store_type.file_class
    }

    /// Serialize to the persisted `data` blob.
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::Error::Serialization(e.to_string()))
    }

    /// Deserialize from the persisted `data` blob.
    pub fn from_json(data: &str) -> crate::Result<Self> {
        serde_json::from_str(data).map_err(|e| crate::Error::Serialization(e.to_string()))
    }
}

/// Caller-supplied fields for creating or updating a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStoreDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub bucket: String,
    #[serde(default)]
    pub folder_prefix: String,
    pub store_type: StoreType,
    pub access_role_arn: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub writeable: Option<bool>,
}

impl FileStoreDraft {
    /// Check shape invariants that do not need persisted state.
    pub fn validate(&self) -> crate::Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(crate::Error::Validation("name must not be empty".to_string()));
            }
            if name.chars().count() > crate::MAX_NAME_LEN {
                return Err(crate::Error::Validation(format!(
                    "name must be at most {} characters",
                    crate::MAX_NAME_LEN
                )));
            }
        }

        if self.bucket.trim().is_empty() {
            return Err(crate::Error::Validation("bucket must not be empty".to_string()));
        }

        if self.access_role_arn.trim().is_empty() {
            return Err(crate::Error::Validation(
                "accessRoleArn must not be empty".to_string(),
            ));
        }

        if self.store_type.file_formats.is_empty() {
            return Err(crate::Error::Validation(
                "storeType.fileFormats must contain at least one format".to_string(),
            ));
        }

        let class = self.store_type.file_class;
        if !self.metadata.is_empty() && !class.allows_metadata() {
            return Err(crate::Error::Validation(format!(
                "Metadata can only be configured to a file store with {} class",
                FileClass::DataTranslation
            )));
        }

        Ok(())
    }
}
