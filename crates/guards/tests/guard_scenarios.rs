use std::rc::Rc;

use consolekit_auth::{
    AbilityContext, Action, AuthSessionState, CredentialStore, Identity, Role, Subject,
};
use consolekit_core::{MemoryNavigator, MemoryStorage, Navigator, UserId};
use consolekit_guards::{
    AclGuard, AclState, AdminArea, GuardDescriptor, GuardPolicy, GuestGuard, GuestState, Rendering,
};

fn operator(role: Role) -> Identity {
    Identity::new(UserId::new(), "operator@example.com", "Operator").with_role(role)
}

fn credentials_with_session() -> CredentialStore {
    let store = CredentialStore::new(Rc::new(MemoryStorage::new()));
    store.save(&operator(Role::USER), "access-token").unwrap();
    store
}

#[test]
fn guest_guard_waits_for_router() {
    let navigator = MemoryNavigator::pending("/login");
    let credentials = credentials_with_session();
    let guard = GuestGuard::new();

    let state = guard.render(&navigator, &AuthSessionState::anonymous(), &credentials);
    let redirected = guard.on_route_change(&navigator, &credentials);

    assert_eq!(state, GuestState::Pending);
    assert_eq!(state.rendering(), Rendering::Nothing);
    assert!(!redirected);
    assert!(navigator.replaced().is_empty());
}

#[test]
fn guest_guard_redirects_once_per_ready_route() {
    consolekit_observability::init();
    let navigator = MemoryNavigator::pending("/login");
    let credentials = credentials_with_session();
    let guard = GuestGuard::new();

    guard.on_route_change(&navigator, &credentials);
    navigator.set_ready(true);

    for _ in 0..5 {
        let state = guard.render(&navigator, &AuthSessionState::loading(), &credentials);
        assert_eq!(state, GuestState::AlreadyAuthenticated);
    }
    assert!(guard.on_route_change(&navigator, &credentials));
    assert!(!guard.on_route_change(&navigator, &credentials));

    assert_eq!(navigator.replaced(), vec!["/".to_string()]);
    assert_eq!(navigator.current_route(), "/");
}

#[test]
fn guest_guard_rechecks_on_new_route() {
    let navigator = MemoryNavigator::new("/login");
    let credentials = credentials_with_session();
    let guard = GuestGuard::new();

    assert!(guard.on_route_change(&navigator, &credentials));
    navigator.visit("/register");
    assert!(guard.on_route_change(&navigator, &credentials));

    assert_eq!(navigator.replaced().len(), 2);
}

#[test]
fn guest_guard_shows_fallback_then_children_for_guests() {
    let navigator = MemoryNavigator::new("/login");
    let credentials = CredentialStore::new(Rc::new(MemoryStorage::new()));
    let guard = GuestGuard::new();

    let loading = guard.render(&navigator, &AuthSessionState::loading(), &credentials);
    let resolved = guard.render(&navigator, &AuthSessionState::anonymous(), &credentials);

    assert_eq!(loading.rendering(), Rendering::Fallback);
    assert_eq!(resolved.rendering(), Rendering::Children { ability: None });
    assert!(!guard.on_route_change(&navigator, &credentials));
}

#[test]
fn guest_guard_treats_unavailable_storage_as_guest() {
    let navigator = MemoryNavigator::new("/login");
    let credentials = CredentialStore::new(Rc::new(MemoryStorage::unavailable()));
    let guard = GuestGuard::new();

    let state = guard.render(&navigator, &AuthSessionState::anonymous(), &credentials);

    assert_eq!(state, GuestState::Guest);
    assert!(!guard.on_route_change(&navigator, &credentials));
}

#[test]
fn acl_guard_with_guest_flag_ignores_ability_outcome() {
    let deny_all = |role: &Role, _: &Subject| AbilityContext::empty(role.clone());
    let descriptor = GuardDescriptor::requires(Action::new("delete"), Subject::new("order"))
        .with_guest_guard(true);
    let guard = AclGuard::with_builder(descriptor, deny_all);

    for session in [
        AuthSessionState::anonymous(),
        AuthSessionState::loading(),
        AuthSessionState::authenticated(operator(Role::USER)),
    ] {
        let decision = guard.evaluate(&session, "/orders");
        assert_eq!(decision.state, AclState::Bypass);
        assert!(decision.rendering.shows_children());
    }
}

#[test]
fn acl_guard_never_renders_children_without_identity() {
    let descriptor = GuardDescriptor::requires(Action::READ, Subject::new("order"));
    let guard = AclGuard::new(descriptor);

    for route in ["/orders", "/", "/admin"] {
        let decision = guard.evaluate(&AuthSessionState::anonymous(), route);
        assert_eq!(decision.rendering, Rendering::BlankShell, "route {route}");
    }
}

#[test]
fn admin_area_redirects_signed_in_non_admins() {
    consolekit_observability::init();
    let policy = GuardPolicy::default().with_admin_area(AdminArea::default());
    let descriptor = GuardDescriptor::requires(Action::READ, Subject::new("user"));
    let guard = AclGuard::new(descriptor).with_policy(policy);
    let navigator = MemoryNavigator::new("/admin/users");

    let decision = guard.evaluate(
        &AuthSessionState::authenticated(operator(Role::USER)),
        &navigator.current_route(),
    );

    assert_eq!(decision.state, AclState::AdminOnly);
    assert_eq!(decision.rendering, Rendering::BlankShell);
    assert!(guard.apply(&decision, &navigator));
    assert_eq!(navigator.replaced(), vec!["/401".to_string()]);
}

#[test]
fn admin_area_lets_admins_through() {
    let policy = GuardPolicy::default().with_admin_area(AdminArea::default());
    let descriptor = GuardDescriptor::requires(Action::new("update"), Subject::new("user"));
    let guard = AclGuard::new(descriptor).with_policy(policy);
    let navigator = MemoryNavigator::new("/admin/users");

    let decision = guard.evaluate(
        &AuthSessionState::authenticated(operator(Role::ADMIN)),
        &navigator.current_route(),
    );

    assert_eq!(decision.state, AclState::Authorized);
    assert!(!guard.apply(&decision, &navigator));
    assert!(navigator.replaced().is_empty());
}

#[test]
fn admin_area_anonymous_visitor_is_not_redirected() {
    let policy = GuardPolicy::default().with_admin_area(AdminArea::default());
    let descriptor = GuardDescriptor::requires(Action::READ, Subject::new("user"));
    let guard = AclGuard::new(descriptor).with_policy(policy);

    let decision = guard.evaluate(&AuthSessionState::anonymous(), "/admin");

    assert_eq!(decision.rendering, Rendering::BlankShell);
    assert_eq!(decision.redirect, None);
}

#[test]
fn guest_guard_at_root_does_not_redirect_to_itself() {
    let navigator = MemoryNavigator::new("/");
    let credentials = credentials_with_session();
    let guard = GuestGuard::new();

    let state = guard.render(&navigator, &AuthSessionState::anonymous(), &credentials);

    assert_eq!(state, GuestState::AlreadyAuthenticated);
    assert!(!guard.on_route_change(&navigator, &credentials));
    assert!(navigator.replaced().is_empty());
}

#[test]
fn guest_guard_honours_custom_root() {
    let navigator = MemoryNavigator::new("/login");
    let credentials = credentials_with_session();
    let guard = GuestGuard::with_policy(GuardPolicy::default().with_root_route("/dashboard"));

    assert!(guard.on_route_change(&navigator, &credentials));
    navigator.visit("/");
    assert!(guard.on_route_change(&navigator, &credentials));

    assert_eq!(
        navigator.replaced(),
        vec!["/dashboard".to_string(), "/dashboard".to_string()]
    );
}

#[test]
fn acl_redirect_is_skipped_once_at_target() {
    let policy = GuardPolicy::default().with_admin_area(AdminArea::default());
    let descriptor = GuardDescriptor::requires(Action::READ, Subject::new("user"));
    let guard = AclGuard::new(descriptor).with_policy(policy);
    let navigator = MemoryNavigator::new("/admin/users");
    let session = AuthSessionState::authenticated(operator(Role::USER));

    let decision = guard.evaluate(&session, &navigator.current_route());

    // Re-rendering with the same decision after the replace landed.
    assert!(guard.apply(&decision, &navigator));
    assert_eq!(navigator.current_route(), "/401");
    assert!(!guard.apply(&decision, &navigator));
    assert_eq!(navigator.replaced(), vec!["/401".to_string()]);
}
