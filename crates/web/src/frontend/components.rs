//! Guard and loader components.

use std::rc::Rc;

use leptos::*;
use leptos_router::use_location;

use consolekit_auth::CredentialStore;
use consolekit_guards::{GuardDescriptor, GuardPolicy, Rendering};
use consolekit_loader::{CancellationToken, FetchError, LocalBoxFuture, ModuleLoad, ModuleLoader};

use crate::browser::RouterNavigator;
use crate::frontend::auth::AuthContext;

/// Neutral shell shown instead of protected content.
#[component]
pub fn BlankShell() -> impl IntoView {
    view! { <div class="blank-shell"></div> }
}

#[component]
pub fn LoadingScreen() -> impl IntoView {
    view! { <div class="loading-screen" aria-busy="true"></div> }
}

/// Renders `children` only when the access guard allows it.
///
/// Descendants can read the visitor's `AbilityContext` with
/// `use_context::<AbilityContext>()`.
#[component]
pub fn AclGuard(
    descriptor: GuardDescriptor,
    #[prop(optional)] policy: Option<GuardPolicy>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let policy = policy
        .or_else(use_context::<GuardPolicy>)
        .unwrap_or_default();
    let pathname = use_location().pathname;
    let navigator = RouterNavigator::new();
    let guard = Rc::new(consolekit_guards::AclGuard::new(descriptor).with_policy(policy));

    let decision = {
        let guard = guard.clone();
        create_memo(move |_| guard.evaluate(&auth.session.get(), &pathname.get()))
    };

    create_effect(move |_| {
        guard.apply(&decision.get(), &navigator);
    });

    move || match decision.get().rendering {
        Rendering::Children { ability } => {
            if let Some(ability) = ability {
                provide_context(ability);
            }
            children().into_view()
        }
        Rendering::BlankShell => view! { <BlankShell/> }.into_view(),
        Rendering::Fallback | Rendering::Nothing => ().into_view(),
    }
}

/// Renders `children` only for visitors without a persisted session.
///
/// Signed-in visitors are sent to the root route; while the auth provider is
/// resolving, `fallback` renders.
#[component]
pub fn GuestGuard(#[prop(optional, into)] fallback: ViewFn, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let credentials = expect_context::<CredentialStore>();
    let policy = use_context::<GuardPolicy>().unwrap_or_default();
    let pathname = use_location().pathname;
    let navigator = RouterNavigator::new();
    let guard = Rc::new(consolekit_guards::GuestGuard::with_policy(policy));

    {
        let (guard, navigator, credentials) =
            (guard.clone(), navigator.clone(), credentials.clone());
        // Keyed on route changes, not on every render.
        create_effect(move |_| {
            let _route = pathname.get();
            guard.on_route_change(&navigator, &credentials);
        });
    }

    move || {
        let session = auth.session.get();
        let _route = pathname.get();
        match guard.render(&navigator, &session, &credentials).rendering() {
            Rendering::Children { .. } => children().into_view(),
            Rendering::Fallback => fallback.run(),
            Rendering::BlankShell | Rendering::Nothing => ().into_view(),
        }
    }
}

#[derive(Clone)]
enum LoadState {
    Pending,
    Ready(View),
    Failed(String),
}

/// Loads a UI module on mount through the shared [`ModuleLoader`].
///
/// Shows a loading screen while pending and a load-failure notice on
/// terminal error. Unmounting cancels any pending retry wait.
#[component]
pub fn Loadable<F>(module: F) -> impl IntoView
where
    F: FnMut() -> LocalBoxFuture<'static, Result<View, FetchError>> + 'static,
{
    let loader = expect_context::<ModuleLoader>();
    let state = create_rw_signal(LoadState::Pending);
    let cancel = CancellationToken::new();

    let mounted = cancel.cancel_on_drop();
    on_cleanup(move || drop(mounted));

    spawn_local(async move {
        let outcome = loader.load(module, &cancel).await;
        if cancel.is_cancelled() {
            return;
        }
        match outcome {
            Ok(ModuleLoad::Ready(view)) => {
                state.try_set(LoadState::Ready(view));
            }
            // The page is restarting; keep showing the loading screen.
            Ok(ModuleLoad::Reloading) => {}
            Err(err) if err.is_abandoned() => {}
            Err(err) => {
                state.try_set(LoadState::Failed(err.to_string()));
            }
        }
    });

    move || match state.get() {
        LoadState::Pending => view! { <LoadingScreen/> }.into_view(),
        LoadState::Ready(view) => view,
        LoadState::Failed(message) => view! {
            <div class="load-failed" role="alert">
                <p>"This page failed to load. Please refresh to try again."</p>
                <small>{message}</small>
            </div>
        }
        .into_view(),
    }
}
