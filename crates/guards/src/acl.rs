//! Authorization-gated rendering for protected views.
//!
//! States are evaluated in order on every render; the first match wins:
//!
//! 1. [`AclState::Bypass`]: guest-guarded view, public error route, or auth
//!    guard disabled. Children render, with abilities if the visitor has them.
//! 2. [`AclState::AdminOnly`]: route inside the configured admin area and the
//!    visitor is not an admin. Blank shell, plus a redirect for signed-in users.
//! 3. [`AclState::Authorized`]: identity present and the required ability holds.
//! 4. [`AclState::Denied`]: everything else. Blank shell, never the children.

use std::cell::RefCell;

use tracing::debug;

use consolekit_auth::{
    AbilityBuilder, AbilityContext, Action, AuthSessionState, Role, RolePolicy, Subject,
};
use consolekit_core::{Navigator, UserId};

use crate::render::Rendering;
use crate::routes::GuardPolicy;

/// Per-view guard configuration. Fixed for the lifetime of a mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardDescriptor {
    pub action: Action,
    pub subject: Subject,
    /// `false` lets anonymous visitors through.
    pub auth_guard: bool,
    /// `true` renders the view for everyone (e.g. login, register).
    pub guest_guard: bool,
}

impl GuardDescriptor {
    /// Requires `action` on `subject`, with the default guard flags.
    pub fn requires(action: Action, subject: Subject) -> Self {
        Self {
            action,
            subject,
            auth_guard: true,
            guest_guard: false,
        }
    }

    pub fn with_auth_guard(mut self, enabled: bool) -> Self {
        self.auth_guard = enabled;
        self
    }

    pub fn with_guest_guard(mut self, enabled: bool) -> Self {
        self.guest_guard = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclState {
    Bypass,
    AdminOnly,
    Authorized,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclDecision {
    pub state: AclState,
    pub rendering: Rendering,
    /// Navigation to perform as a side effect, outside of rendering.
    pub redirect: Option<String>,
}

impl AclDecision {
    fn render(state: AclState, rendering: Rendering) -> Self {
        Self {
            state,
            rendering,
            redirect: None,
        }
    }
}

/// Decide what a guarded view renders.
///
/// Pure: `ability` is whatever the caller built for the current identity
/// (see [`AclGuard::ability_for`]); the capability check itself runs fresh on
/// every call.
pub fn decide_acl(
    descriptor: &GuardDescriptor,
    session: &AuthSessionState,
    ability: Option<&AbilityContext>,
    route: &str,
    policy: &GuardPolicy,
) -> AclDecision {
    let user = session.user.as_ref();

    if descriptor.guest_guard || policy.is_public_route(route) || !descriptor.auth_guard {
        let ability = user.and(ability).cloned();
        return AclDecision::render(AclState::Bypass, Rendering::Children { ability });
    }

    if let Some(area) = policy.admin_area.as_ref().filter(|a| a.contains(route)) {
        let role = user.map(|u| u.effective_role()).unwrap_or_default();
        if role != area.admin_role {
            return AclDecision {
                state: AclState::AdminOnly,
                rendering: Rendering::BlankShell,
                redirect: user.map(|_| area.unauthorized_route.clone()),
            };
        }
    }

    match (user, ability) {
        (Some(_), Some(ability)) if ability.can(&descriptor.action, &descriptor.subject) => {
            AclDecision::render(
                AclState::Authorized,
                Rendering::Children {
                    ability: Some(ability.clone()),
                },
            )
        }
        _ => AclDecision::render(AclState::Denied, Rendering::BlankShell),
    }
}

/// Stateful access guard for one mounted view.
///
/// Builds the ability context at most once per identity and keeps it
/// read-only until the identity changes.
pub struct AclGuard<B = RolePolicy> {
    descriptor: GuardDescriptor,
    policy: GuardPolicy,
    builder: B,
    ability: RefCell<Option<(UserId, Role, AbilityContext)>>,
}

impl<B> core::fmt::Debug for AclGuard<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AclGuard")
            .field("descriptor", &self.descriptor)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl AclGuard<RolePolicy> {
    pub fn new(descriptor: GuardDescriptor) -> Self {
        Self::with_builder(descriptor, RolePolicy)
    }
}

impl<B: AbilityBuilder> AclGuard<B> {
    pub fn with_builder(descriptor: GuardDescriptor, builder: B) -> Self {
        Self {
            descriptor,
            policy: GuardPolicy::default(),
            builder,
            ability: RefCell::new(None),
        }
    }

    pub fn with_policy(mut self, policy: GuardPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn descriptor(&self) -> &GuardDescriptor {
        &self.descriptor
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Ability context for the session's identity, building it on first use
    /// or when the identity changed. `None` without an identity.
    pub fn ability_for(&self, session: &AuthSessionState) -> Option<AbilityContext> {
        let Some(user) = session.user.as_ref() else {
            self.ability.borrow_mut().take();
            return None;
        };
        let role = user.effective_role();

        let mut cached = self.ability.borrow_mut();
        match cached.as_ref() {
            Some((id, cached_role, ability)) if *id == user.id && *cached_role == role => {
                Some(ability.clone())
            }
            _ => {
                debug!(
                    user = %user.id,
                    role = %role,
                    subject = %self.descriptor.subject,
                    "building ability context"
                );
                let ability = self.builder.build(&role, &self.descriptor.subject);
                *cached = Some((user.id, role, ability.clone()));
                Some(ability)
            }
        }
    }

    /// Evaluate the guard for one render.
    pub fn evaluate(&self, session: &AuthSessionState, route: &str) -> AclDecision {
        let ability = self.ability_for(session);
        let decision = decide_acl(&self.descriptor, session, ability.as_ref(), route, &self.policy);
        debug!(route, state = ?decision.state, "acl guard decision");
        decision
    }

    /// Perform the decision's redirect, if any. Returns whether it navigated.
    pub fn apply(&self, decision: &AclDecision, navigator: &dyn Navigator) -> bool {
        match decision.redirect.as_deref() {
            Some(target) if navigator.current_route() != target => {
                tracing::info!(
                    from = %navigator.current_route(),
                    to = target,
                    "redirecting unauthorized visitor"
                );
                navigator.replace(target);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use consolekit_auth::Identity;

    fn products_read() -> GuardDescriptor {
        GuardDescriptor::requires(Action::READ, Subject::new("product"))
    }

    fn products_update() -> GuardDescriptor {
        GuardDescriptor::requires(Action::new("update"), Subject::new("product"))
    }

    fn signed_in(role: Option<Role>) -> AuthSessionState {
        let mut identity = Identity::new(UserId::new(), "op@example.com", "Operator");
        identity.role = role;
        AuthSessionState::authenticated(identity)
    }

    #[test]
    fn guest_guard_bypasses_failed_check() {
        let session = signed_in(Some(Role::USER));
        let guard = AclGuard::new(products_update().with_guest_guard(true));

        let decision = guard.evaluate(&session, "/products");

        assert_eq!(decision.state, AclState::Bypass);
        assert!(decision.rendering.shows_children());
        assert!(decision.rendering.ability().is_some());
    }

    #[test]
    fn bypass_without_identity_has_no_ability() {
        let guard = AclGuard::new(products_read().with_auth_guard(false));

        let decision = guard.evaluate(&AuthSessionState::anonymous(), "/products");

        assert_eq!(decision.rendering, Rendering::Children { ability: None });
    }

    #[test]
    fn error_routes_bypass() {
        let guard = AclGuard::new(products_update());

        let decision = guard.evaluate(&AuthSessionState::anonymous(), "/500");

        assert_eq!(decision.state, AclState::Bypass);
    }

    #[test]
    fn anonymous_visitor_gets_blank_shell() {
        let guard = AclGuard::new(products_read());

        let decision = guard.evaluate(&AuthSessionState::anonymous(), "/products");

        assert_eq!(decision.state, AclState::Denied);
        assert_eq!(decision.rendering, Rendering::BlankShell);
        assert_eq!(decision.redirect, None);
    }

    #[test]
    fn loading_session_gets_blank_shell() {
        let guard = AclGuard::new(products_read());

        let decision = guard.evaluate(&AuthSessionState::loading(), "/products");

        assert_eq!(decision.rendering, Rendering::BlankShell);
    }

    #[test]
    fn failed_check_gets_blank_shell() {
        let guard = AclGuard::new(products_update());

        let decision = guard.evaluate(&signed_in(Some(Role::USER)), "/products");

        assert_eq!(decision.state, AclState::Denied);
        assert_eq!(decision.rendering, Rendering::BlankShell);
    }

    #[test]
    fn missing_role_falls_back_to_least_privileged() {
        let guard = AclGuard::new(products_read());

        let decision = guard.evaluate(&signed_in(None), "/products");

        assert_eq!(decision.state, AclState::Authorized);
        assert_eq!(decision.rendering.ability().map(|a| a.role()), Some(&Role::USER));
    }

    #[test]
    fn missing_ability_context_is_denied() {
        let decision = decide_acl(
            &products_read(),
            &signed_in(Some(Role::ADMIN)),
            None,
            "/products",
            &GuardPolicy::default(),
        );

        assert_eq!(decision.state, AclState::Denied);
    }

    #[test]
    fn ability_built_once_per_identity() {
        let builds = Cell::new(0);
        let builder = |role: &Role, subject: &Subject| {
            builds.set(builds.get() + 1);
            RolePolicy.build(role, subject)
        };
        let guard = AclGuard::with_builder(products_read(), builder);
        let alice = signed_in(Some(Role::USER));
        let bob = signed_in(Some(Role::ADMIN));

        guard.evaluate(&alice, "/products");
        guard.evaluate(&alice, "/products");
        assert_eq!(builds.get(), 1);

        guard.evaluate(&bob, "/products");
        assert_eq!(builds.get(), 2);

        guard.evaluate(&AuthSessionState::anonymous(), "/products");
        guard.evaluate(&bob, "/products");
        assert_eq!(builds.get(), 3);
    }
}
