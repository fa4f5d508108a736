use consolekit_loader::PageReloader;

/// Reloads the page via `window.location.reload()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationReloader;

impl PageReloader for LocationReloader {
    fn reload(&self) {
        let Some(window) = web_sys::window() else {
            tracing::error!("no window; cannot reload page");
            return;
        };
        if let Err(err) = window.location().reload() {
            tracing::error!("page reload failed: {err:?}");
        }
    }
}
