//! One-shot forced reload for deployment skew.
//!
//! After a redeploy the chunk a stale page asks for no longer exists, and no
//! amount of retrying will bring it back. The fix is a full page reload onto
//! the new deployment, done at most once per incident: a persisted flag
//! records that the reload already happened so a permanently broken module
//! surfaces as an error instead of reloading forever.

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use consolekit_core::DurableStorage;

use crate::error::{FetchError, LoadError};

/// Storage key of the persisted reload flag.
pub const DEFAULT_RELOAD_FLAG_KEY: &str = "page-has-been-force-refreshed";

/// Triggers a full page reload. Cannot be cancelled once issued.
pub trait PageReloader {
    fn reload(&self);
}

/// Result of a load that may have handed control to a page reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLoad<T> {
    Ready(T),

    /// A reload was issued; the page is restarting and the caller should
    /// render nothing further.
    Reloading,
}

impl<T> ModuleLoad<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            ModuleLoad::Ready(module) => Some(module),
            ModuleLoad::Reloading => None,
        }
    }

    pub fn is_reloading(&self) -> bool {
        matches!(self, ModuleLoad::Reloading)
    }
}

/// Persisted "a forced reload already happened" flag.
///
/// Stored as a JSON boolean (`"true"` / `"false"`). Absent, unparsable or
/// unreadable values read as `false`; failed writes are dropped. An
/// in-memory latch additionally caps forced reloads at one per page
/// lifetime, which is what still holds when storage is unavailable.
pub struct ForceReloadFlag {
    storage: Rc<dyn DurableStorage>,
    key: String,
    reload_issued: Cell<bool>,
}

impl core::fmt::Debug for ForceReloadFlag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ForceReloadFlag")
            .field("key", &self.key)
            .field("reload_issued", &self.reload_issued.get())
            .finish_non_exhaustive()
    }
}

impl ForceReloadFlag {
    pub fn new(storage: Rc<dyn DurableStorage>) -> Self {
        Self::with_key(storage, DEFAULT_RELOAD_FLAG_KEY)
    }

    pub fn with_key(storage: Rc<dyn DurableStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            reload_issued: Cell::new(false),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn read(&self) -> bool {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                warn!(key = %self.key, error = %err, "reload flag unreadable; treating as false");
                return false;
            }
        };

        match serde_json::from_str::<bool>(&raw) {
            Ok(value) => value,
            Err(_) => {
                debug!(key = %self.key, value = %raw, "reload flag unparsable; treating as false");
                false
            }
        }
    }

    pub fn set(&self, value: bool) {
        let encoded = if value { "true" } else { "false" };
        if let Err(err) = self.storage.set(&self.key, encoded) {
            warn!(key = %self.key, error = %err, "reload flag write dropped");
        }
    }

    /// Whether this page lifetime already issued a forced reload.
    pub fn reload_issued(&self) -> bool {
        self.reload_issued.get()
    }

    /// Settle a finished load attempt against the flag.
    ///
    /// `already_reloaded` is the flag value read before the attempt started.
    pub(crate) fn settle<T>(
        &self,
        already_reloaded: bool,
        result: Result<T, FetchError>,
        reloader: &dyn PageReloader,
    ) -> Result<ModuleLoad<T>, LoadError> {
        match result {
            Ok(module) => {
                if already_reloaded {
                    info!("module loaded after forced reload");
                }
                self.set(false);
                Ok(ModuleLoad::Ready(module))
            }
            Err(err) if already_reloaded || self.reload_issued.get() => {
                error!(error = %err, "module still failing after forced reload");
                Err(LoadError::DeploymentSkew { source: err })
            }
            Err(err) => {
                warn!(error = %err, "module load failed; forcing a page reload");
                self.set(true);
                self.reload_issued.set(true);
                reloader.reload();
                Ok(ModuleLoad::Reloading)
            }
        }
    }
}

/// Load a module once, recovering from deployment skew with at most one
/// forced reload.
///
/// 1. Read the flag.
/// 2. Run `operation` once.
/// 3. Success clears the flag and yields [`ModuleLoad::Ready`].
/// 4. Failure with the flag unset sets it, reloads the page and yields
///    [`ModuleLoad::Reloading`]. Failure with the flag already set returns
///    [`LoadError::DeploymentSkew`] and does not reload again.
pub async fn load_with_forced_reload<T, F, Fut>(
    operation: F,
    flag: &ForceReloadFlag,
    reloader: &dyn PageReloader,
) -> Result<ModuleLoad<T>, LoadError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let already_reloaded = flag.read();
    let result = operation().await;
    flag.settle(already_reloaded, result, reloader)
}
