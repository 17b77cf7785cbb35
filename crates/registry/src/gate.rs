//! Authorization gate for mutating operations.

use crate::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use filestore_core::Identity;
use filestore_core::config::GroupsConfig;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

/// Group that may create, update and delete file stores.
pub const ADMIN_GROUP: &str = "admin";

/// Resolves a user's groups within a tenant.
#[async_trait]
pub trait GroupResolver: Send + Sync {
    async fn get_groups(&self, user_id: &str, tenant_id: &str) -> RegistryResult<BTreeSet<String>>;
}

/// Asks the user-management service over HTTP.
///
/// `GET {base_url}/v1/tenants/{tenant}/users/{user}/groups` returning a JSON
/// array of group names. A 404 means the user has no groups in the tenant.
#[derive(Debug, Clone)]
pub struct HttpGroupResolver {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpGroupResolver {
    pub fn new(base_url: &str, timeout: Duration) -> RegistryResult<Self> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| RegistryError::Transport(format!("invalid groups base url: {e}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn groups_url(&self, user_id: &str, tenant_id: &str) -> RegistryResult<reqwest::Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RegistryError::Transport("groups base url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "tenants", tenant_id, "users", user_id, "groups"]);
        Ok(url)
    }
}

#[async_trait]
impl GroupResolver for HttpGroupResolver {
    #[instrument(skip(self), fields(resolver = "http"))]
    async fn get_groups(&self, user_id: &str, tenant_id: &str) -> RegistryResult<BTreeSet<String>> {
        let url = self.groups_url(user_id, tenant_id)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::Transport(format!("group lookup failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(BTreeSet::new());
        }
        if !response.status().is_success() {
            return Err(RegistryError::Transport(format!(
                "group lookup returned {}",
                response.status()
            )));
        }

        let groups: Vec<String> = response
            .json()
            .await
            .map_err(|e| RegistryError::Transport(format!("invalid group lookup body: {e}")))?;
        Ok(groups.into_iter().collect())
    }
}

/// Fixed admin list, for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticGroupResolver {
    admins: BTreeSet<String>,
}

impl StaticGroupResolver {
    pub fn new(admins: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            admins: admins.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl GroupResolver for StaticGroupResolver {
    async fn get_groups(&self, user_id: &str, _tenant_id: &str) -> RegistryResult<BTreeSet<String>> {
        let mut groups = BTreeSet::new();
        if self.admins.contains(user_id) {
            groups.insert(ADMIN_GROUP.to_string());
        }
        Ok(groups)
    }
}

/// Create a group resolver from configuration.
pub fn resolver_from_config(config: &GroupsConfig) -> RegistryResult<Arc<dyn GroupResolver>> {
    match config {
        GroupsConfig::Http {
            base_url,
            timeout_secs,
        } => Ok(Arc::new(HttpGroupResolver::new(
            base_url,
            Duration::from_secs(*timeout_secs),
        )?)),
        GroupsConfig::Static { admins } => {
            tracing::warn!(admins = admins.len(), "Using static admin list for authorization");
            Ok(Arc::new(StaticGroupResolver::new(admins.iter().cloned())))
        }
    }
}

/// Admin-membership check run before every mutating operation.
#[derive(Clone)]
pub struct AdminGate {
    resolver: Arc<dyn GroupResolver>,
}

impl AdminGate {
    pub fn new(resolver: Arc<dyn GroupResolver>) -> Self {
        Self { resolver }
    }

    /// Fail with `Forbidden` unless the caller is in the admin group of its tenant.
    #[instrument(skip(self, identity), fields(tenant_id = %identity.tenant, user_id = %identity.user_id))]
    pub async fn require_admin(&self, identity: &Identity) -> RegistryResult<()> {
        let groups = self
            .resolver
            .get_groups(&identity.user_id, &identity.tenant)
            .await?;
        if !groups.contains(ADMIN_GROUP) {
            tracing::warn!("Caller lacks admin group membership");
            return Err(RegistryError::Forbidden);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_resolver_grants_admin_only_to_listed_users() {
        let gate = AdminGate::new(Arc::new(StaticGroupResolver::new(["alice"])));

        gate.require_admin(&Identity::new("t1", "alice")).await.unwrap();
        let err = gate
            .require_admin(&Identity::new("t1", "bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Forbidden));
    }

    #[test]
    fn test_groups_url_escapes_segments() {
        let resolver =
            HttpGroupResolver::new("http://users.internal/base/", Duration::from_secs(1)).unwrap();
        let url = resolver.groups_url("user 1", "tenant/a").unwrap();
        assert_eq!(
            url.as_str(),
            "http://users.internal/base/v1/tenants/tenant%2Fa/users/user%201/groups"
        );
    }
}
