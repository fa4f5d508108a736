//! Timer abstraction so the retry wait works on both tokio and the browser
//! event loop.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future that need not be `Send` (single-threaded UI event loop).
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub trait Timer {
    /// Resolve after `duration`. Dropping the future abandons the wait.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Timer backed by `tokio::time`.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
impl Timer for TokioTimer {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
