//! `consolekit-loader` — resilient on-demand loading of UI modules.
//!
//! Two independent recovery paths:
//! - [`retry_load`]: bounded retry with a constant interval for transient
//!   fetch failures, abandoned cleanly when the consumer goes away.
//! - [`load_with_forced_reload`]: a single forced page reload when the
//!   artifact vanished because a newer deployment replaced it, guarded by a
//!   persisted flag so a permanently broken module cannot reload forever.
//!
//! [`ModuleLoader`] composes both.

pub mod cancel;
pub mod config;
pub mod error;
pub mod loader;
pub mod reload;
pub mod retry;
pub mod timer;

pub use cancel::{CancelOnDrop, CancellationToken};
pub use config::{ConfigError, LoaderConfig};
pub use error::{FetchError, LoadError};
pub use loader::ModuleLoader;
pub use reload::{
    DEFAULT_RELOAD_FLAG_KEY, ForceReloadFlag, ModuleLoad, PageReloader, load_with_forced_reload,
};
pub use retry::{RetryPolicy, retry_load};
pub use timer::{LocalBoxFuture, Timer};

#[cfg(not(target_arch = "wasm32"))]
pub use timer::TokioTimer;
