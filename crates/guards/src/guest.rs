//! Guard for views that signed-in sessions must not see (login, register).

use std::cell::RefCell;

use tracing::{debug, info};

use consolekit_auth::{AuthSessionState, CredentialStore};
use consolekit_core::Navigator;

use crate::render::Rendering;
use crate::routes::GuardPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuestState {
    /// Router not ready; render nothing and do nothing.
    Pending,
    /// A persisted session exists; the visitor is being sent to the root.
    AlreadyAuthenticated,
    /// The auth provider is still resolving.
    Loading,
    Guest,
}

impl GuestState {
    pub fn rendering(self) -> Rendering {
        match self {
            GuestState::Pending | GuestState::AlreadyAuthenticated => Rendering::Nothing,
            GuestState::Loading => Rendering::Fallback,
            GuestState::Guest => Rendering::Children { ability: None },
        }
    }
}

/// First matching state wins: pending, already authenticated, loading, guest.
pub fn decide_guest(
    router_ready: bool,
    has_persisted_session: bool,
    auth_loading: bool,
) -> GuestState {
    if !router_ready {
        GuestState::Pending
    } else if has_persisted_session {
        GuestState::AlreadyAuthenticated
    } else if auth_loading {
        GuestState::Loading
    } else {
        GuestState::Guest
    }
}

/// Stateful guest guard for one mounted view.
///
/// [`render`](Self::render) is side-effect free and may run on every render.
/// [`on_route_change`](Self::on_route_change) performs the redirect and is
/// keyed on `(ready, route)`, so repeated renders on the same ready route
/// navigate at most once.
#[derive(Debug, Default)]
pub struct GuestGuard {
    policy: GuardPolicy,
    last_checked: RefCell<Option<String>>,
}

impl GuestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: GuardPolicy) -> Self {
        Self {
            policy,
            last_checked: RefCell::new(None),
        }
    }

    pub fn render(
        &self,
        navigator: &dyn Navigator,
        session: &AuthSessionState,
        credentials: &CredentialStore,
    ) -> GuestState {
        let ready = navigator.is_ready();
        let persisted = ready && credentials.has_persisted_session();
        decide_guest(ready, persisted, session.is_loading)
    }

    /// Redirect a persisted session to the root. Returns whether it navigated.
    pub fn on_route_change(
        &self,
        navigator: &dyn Navigator,
        credentials: &CredentialStore,
    ) -> bool {
        let key = navigator.is_ready().then(|| navigator.current_route());

        {
            let mut last = self.last_checked.borrow_mut();
            if *last == key {
                return false;
            }
            *last = key.clone();
        }

        let Some(route) = key else {
            return false;
        };

        if self.policy.is_root(&route) || !credentials.has_persisted_session() {
            debug!(route = %route, "guest guard: no redirect");
            return false;
        }

        info!(
            from = %route,
            to = %self.policy.root_route,
            "signed-in session on guest view; redirecting"
        );
        navigator.replace(&self.policy.root_route);
        true
    }
}
