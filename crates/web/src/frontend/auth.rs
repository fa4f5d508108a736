//! Reactive auth session shared through Leptos context.

use leptos::*;

use consolekit_auth::{AuthSessionState, AuthStateSource, CredentialStore, Identity};

/// Auth provider handle. The provider writes `session`; guards only read it.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub session: RwSignal<AuthSessionState>,
}

impl AuthContext {
    /// Seed the session from persisted credentials.
    pub fn restore(credentials: &CredentialStore) -> Self {
        let initial = match (credentials.access_token(), credentials.identity()) {
            (Some(_), Some(identity)) => AuthSessionState::authenticated(identity),
            _ => AuthSessionState::anonymous(),
        };
        Self {
            session: create_rw_signal(initial),
        }
    }

    pub fn sign_in(&self, credentials: &CredentialStore, identity: Identity, access_token: &str) {
        if let Err(err) = credentials.save(&identity, access_token) {
            tracing::warn!(error = %err, "could not persist session; continuing in memory");
        }
        self.session.set(AuthSessionState::authenticated(identity));
    }

    pub fn sign_out(&self, credentials: &CredentialStore) {
        credentials.clear();
        self.session.set(AuthSessionState::anonymous());
    }
}

impl AuthStateSource for AuthContext {
    fn session(&self) -> AuthSessionState {
        self.session.get_untracked()
    }
}
