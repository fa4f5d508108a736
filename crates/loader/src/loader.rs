//! Composed loader used at the page-mounting boundary.

use std::future::Future;
use std::rc::Rc;

use tracing::debug;

use consolekit_core::DurableStorage;

use crate::cancel::CancellationToken;
use crate::config::LoaderConfig;
use crate::error::{FetchError, LoadError};
use crate::reload::{ForceReloadFlag, ModuleLoad, PageReloader};
use crate::retry::{RetryPolicy, retry_load};
use crate::timer::Timer;

/// Bounded retry nested inside the one-shot forced reload.
///
/// Transient blips are absorbed by the retry budget; only when the budget
/// is spent does the failure count as deployment skew and trigger the
/// single reload. Cloning shares the reload flag.
#[derive(Clone)]
pub struct ModuleLoader {
    retry: RetryPolicy,
    flag: Rc<ForceReloadFlag>,
    reloader: Rc<dyn PageReloader>,
    timer: Rc<dyn Timer>,
}

impl core::fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("retry", &self.retry)
            .field("flag", &self.flag)
            .finish_non_exhaustive()
    }
}

impl ModuleLoader {
    pub fn new(
        config: &LoaderConfig,
        storage: Rc<dyn DurableStorage>,
        reloader: Rc<dyn PageReloader>,
        timer: Rc<dyn Timer>,
    ) -> Self {
        let flag = ForceReloadFlag::with_key(storage, config.reload_flag_key.clone());
        Self {
            retry: config.retry,
            flag: Rc::new(flag),
            reloader,
            timer,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn flag(&self) -> &ForceReloadFlag {
        &self.flag
    }

    /// Load a module for one mounted consumer.
    ///
    /// `cancel` belongs to that consumer. Once it is cancelled, whether
    /// during a retry wait or while a fetch is in flight, the load resolves
    /// to [`LoadError::Abandoned`] without touching the reload flag or
    /// reloading the page.
    pub async fn load<T, F, Fut>(
        &self,
        operation: F,
        cancel: &CancellationToken,
    ) -> Result<ModuleLoad<T>, LoadError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let already_reloaded = self.flag.read();

        let result = match retry_load(operation, self.retry, self.timer.as_ref(), cancel).await {
            Ok(module) => Ok(module),
            Err(LoadError::RetryExhausted { attempts, source }) => {
                debug!(attempts, "retry budget spent; treating as deployment skew");
                Err(source)
            }
            Err(other) => return Err(other),
        };

        // The last fetch may have finished after teardown.
        if cancel.is_cancelled() {
            debug!("consumer gone while module fetch was in flight; abandoning load");
            return Err(LoadError::Abandoned);
        }

        self.flag.settle(already_reloaded, result, self.reloader.as_ref())
    }
}
