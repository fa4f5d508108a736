//! Console shell: wiring and routes.

use std::rc::Rc;

use anyhow::Context;
use leptos::*;
use leptos_router::*;

use consolekit_auth::{AbilityContext, Action, CredentialStore, Subject};
use consolekit_core::DurableStorage;
use consolekit_guards::GuardDescriptor;
use consolekit_loader::{FetchError, LocalBoxFuture, ModuleLoader};

use crate::browser::{BrowserTimer, LocalStorage, LocationReloader, dynamic_import};
use crate::config::{CONFIG_ELEMENT_ID, WebConfig};
use crate::frontend::auth::AuthContext;
use crate::frontend::components::{AclGuard, GuestGuard, Loadable, LoadingScreen};

/// Read the configuration block embedded in the host page, if any.
fn embedded_config() -> anyhow::Result<WebConfig> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .context("no document")?;

    match document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    {
        Some(raw) => WebConfig::from_json(&raw),
        None => Ok(WebConfig::default()),
    }
}

/// Provide storage, credentials, auth, guard policy and loader to the tree.
fn provide_services() {
    let config = embedded_config().unwrap_or_else(|err| {
        tracing::warn!("using default console configuration: {err:#}");
        WebConfig::default()
    });
    let loader_config = config.loader_config().unwrap_or_else(|err| {
        tracing::warn!("using default loader configuration: {err:#}");
        Default::default()
    });

    let storage: Rc<dyn DurableStorage> = Rc::new(LocalStorage);
    let credentials = CredentialStore::new(storage.clone());
    let loader = ModuleLoader::new(
        &loader_config,
        storage,
        Rc::new(LocationReloader),
        Rc::new(BrowserTimer),
    );

    provide_context(AuthContext::restore(&credentials));
    provide_context(credentials);
    provide_context(config.guards);
    provide_context(loader);
}

/// Module source for [`Loadable`]: import the page's chunk, then build its view.
fn chunk_page(
    specifier: &'static str,
    page: fn() -> View,
) -> impl FnMut() -> LocalBoxFuture<'static, Result<View, FetchError>> {
    move || {
        Box::pin(async move {
            dynamic_import(specifier).await?;
            Ok(page())
        })
    }
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    provide_services();

    view! {
        <Router>
            <Routes>
                <Route path="/login" view=LoginPage/>
                <Route path="/" view=HomePage/>
                <Route path="/admin/products" view=ProductsPage/>
                <Route path="/404" view=NotFoundPage/>
                <Route path="/*any" view=NotFoundPage/>
            </Routes>
        </Router>
    }
}

fn login_view() -> View {
    view! { <h1>"Sign in"</h1> }.into_view()
}

fn dashboard_view() -> View {
    view! { <h1>"Dashboard"</h1> }.into_view()
}

fn products_view() -> View {
    view! { <ProductsHeader/> }.into_view()
}

#[component]
fn LoginPage() -> impl IntoView {
    view! {
        <GuestGuard fallback=|| view! { <LoadingScreen/> }>
            <Loadable module={chunk_page("/chunks/login.js", login_view)}/>
        </GuestGuard>
    }
}

#[component]
fn HomePage() -> impl IntoView {
    let descriptor = GuardDescriptor::requires(Action::READ, Subject::new("dashboard"));

    view! {
        <AclGuard descriptor=descriptor>
            <Loadable module={chunk_page("/chunks/dashboard.js", dashboard_view)}/>
        </AclGuard>
    }
}

#[component]
fn ProductsPage() -> impl IntoView {
    let descriptor = GuardDescriptor::requires(Action::READ, Subject::new("product"));

    view! {
        <AclGuard descriptor=descriptor>
            <Loadable module={chunk_page("/chunks/products.js", products_view)}/>
        </AclGuard>
    }
}

#[component]
fn ProductsHeader() -> impl IntoView {
    let can_edit = use_context::<AbilityContext>()
        .map(|ability| ability.can(&Action::new("update"), &Subject::new("product")))
        .unwrap_or(false);

    view! {
        <header>
            <h1>"Products"</h1>
            <Show when=move || can_edit>
                <button>"New product"</button>
            </Show>
        </header>
    }
}

#[component]
fn NotFoundPage() -> impl IntoView {
    let descriptor = GuardDescriptor::requires(Action::READ, Subject::ALL).with_auth_guard(false);

    view! {
        <AclGuard descriptor=descriptor>
            <h1>"Page not found"</h1>
        </AclGuard>
    }
}
