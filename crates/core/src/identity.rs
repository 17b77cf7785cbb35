//! Caller identity as resolved by the boundary layer.

use serde::{Deserialize, Serialize};

/// Who is calling, on behalf of which tenant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub tenant: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Identity {
    pub fn new(tenant: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            tenant: tenant.into(),
            user_id: user_id.into(),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}
