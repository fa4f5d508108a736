use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use consolekit_core::UserId;

use crate::Role;

/// Authenticated identity record, as resolved by the auth provider and as
/// persisted in durable storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    pub email: String,
    pub full_name: String,

    /// May be missing on freshly registered accounts.
    #[serde(default)]
    pub role: Option<Role>,

    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(id: UserId, email: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            role: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// The identity's role, or the least-privileged role when unset.
    pub fn effective_role(&self) -> Role {
        self.role.clone().unwrap_or_default()
    }
}
