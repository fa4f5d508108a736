//! Session state published by the external auth provider.

use crate::Identity;

/// Snapshot of the auth provider's state.
///
/// Owned and mutated exclusively by the provider; guards only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSessionState {
    pub is_loading: bool,
    pub user: Option<Identity>,
}

impl AuthSessionState {
    /// The provider is still resolving the session.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            user: None,
        }
    }

    /// Resolved with no authenticated identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: Identity) -> Self {
        Self {
            is_loading: false,
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Read access to the current auth session.
pub trait AuthStateSource {
    fn session(&self) -> AuthSessionState;
}

impl AuthStateSource for AuthSessionState {
    fn session(&self) -> AuthSessionState {
        self.clone()
    }
}
