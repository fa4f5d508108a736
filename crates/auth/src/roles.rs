use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier carried on an authenticated identity.
///
/// Roles are opaque strings at this layer; the [`crate::AbilityBuilder`]
/// decides what each one may do.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    /// Full access to every subject.
    pub const ADMIN: Role = Role(Cow::Borrowed("ADMIN"));

    /// Least-privileged role, used when an identity carries none.
    pub const USER: Role = Role(Cow::Borrowed("USER"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::ADMIN
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::USER
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
