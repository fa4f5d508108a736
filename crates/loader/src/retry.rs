//! Bounded retry with a constant interval.
//!
//! The interval never grows: this targets brief network blips while a chunk
//! is fetched, not an overloaded server.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::cancel::CancellationToken;
use crate::config::ConfigError;
use crate::error::{FetchError, LoadError};
use crate::timer::Timer;

/// Retry budget and the fixed wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    retries: u32,
    interval: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_RETRIES: u32 = 5;
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1500);

    /// `interval` must be non-zero.
    pub fn new(retries: u32, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(Self { retries, interval })
    }

    /// Retries after the first attempt (the operation runs at most
    /// `retries + 1` times).
    pub fn retries(&self) -> u32 {
        self.retries
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: Self::DEFAULT_RETRIES,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

/// Run `operation` until it succeeds or the budget is spent.
///
/// - On failure with retries remaining: wait `policy.interval()` on `timer`,
///   then call `operation` again.
/// - On failure with no retries left: [`LoadError::RetryExhausted`] wrapping
///   the last failure.
/// - If `cancel` fires before or during a wait: [`LoadError::Abandoned`];
///   the operation is not invoked again.
pub async fn retry_load<T, F, Fut>(
    mut operation: F,
    policy: RetryPolicy,
    timer: &dyn Timer,
    cancel: &CancellationToken,
) -> Result<T, LoadError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut remaining = policy.retries;
    let mut attempt: u32 = 1;

    loop {
        if cancel.is_cancelled() {
            debug!(attempt, "consumer gone before attempt; abandoning load");
            return Err(LoadError::Abandoned);
        }

        let err = match operation().await {
            Ok(module) => {
                if attempt > 1 {
                    debug!(attempt, "module loaded after retry");
                }
                return Ok(module);
            }
            Err(err) => err,
        };

        if remaining == 0 {
            error!(attempts = attempt, error = %err, "module load retries exhausted");
            return Err(LoadError::RetryExhausted {
                attempts: attempt,
                source: err,
            });
        }

        warn!(
            attempt,
            remaining,
            interval_ms = policy.interval.as_millis() as u64,
            error = %err,
            "module load failed; retrying"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(attempt, "consumer gone during retry wait; abandoning load");
                return Err(LoadError::Abandoned);
            }
            _ = timer.sleep(policy.interval) => {}
        }

        remaining -= 1;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::timer::{LocalBoxFuture, TokioTimer};

    /// Counts sleeps and never actually waits.
    #[derive(Default)]
    struct InstantTimer {
        sleeps: Cell<u32>,
    }

    impl Timer for InstantTimer {
        fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
            self.sleeps.set(self.sleeps.get() + 1);
            Box::pin(async {})
        }
    }

    fn failing_until(
        calls: &Cell<u32>,
        failures: u32,
    ) -> impl FnMut() -> std::future::Ready<Result<u32, FetchError>> + '_ {
        move || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            std::future::ready(if n <= failures {
                Err(FetchError::new(format!("chunk missing (call {n})")))
            } else {
                Ok(n)
            })
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert_eq!(
            RetryPolicy::new(3, Duration::ZERO),
            Err(ConfigError::ZeroInterval)
        );
    }

    #[test]
    fn defaults_match_console_budget() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries(), 5);
        assert_eq!(policy.interval(), Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn first_success_needs_no_wait() {
        let calls = Cell::new(0);
        let timer = InstantTimer::default();

        let value = retry_load(
            failing_until(&calls, 0),
            RetryPolicy::default(),
            &timer,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(value, 1);
        assert_eq!(timer.sleeps.get(), 0);
    }

    #[tokio::test]
    async fn zero_budget_fails_without_waiting() {
        let calls = Cell::new(0);
        let timer = InstantTimer::default();
        let policy = RetryPolicy::default().with_retries(0);

        let err = retry_load(failing_until(&calls, 1), policy, &timer, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::RetryExhausted { attempts: 1, .. }));
        assert_eq!(calls.get(), 1);
        assert_eq!(timer.sleeps.get(), 0);
    }

    #[tokio::test]
    async fn exhaustion_wraps_last_failure() {
        let calls = Cell::new(0);
        let timer = InstantTimer::default();
        let policy = RetryPolicy::default().with_retries(2);

        let err = retry_load(failing_until(&calls, 10), policy, &timer, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err.fetch_error().map(FetchError::message),
            Some("chunk missing (call 3)")
        );
        assert_eq!(timer.sleeps.get(), 2);
    }

    #[tokio::test]
    async fn already_cancelled_never_invokes_operation() {
        let calls = Cell::new(0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = retry_load(failing_until(&calls, 0), RetryPolicy::default(), &TokioTimer, &cancel)
            .await
            .unwrap_err();

        assert!(err.is_abandoned());
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn interval_is_constant() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(100)).unwrap();
        let start = tokio::time::Instant::now();

        retry_load(failing_until(&calls, 3), policy, &TokioTimer, &CancellationToken::new())
            .await
            .unwrap();

        // No backoff growth: 3 waits of 100ms, not 100 + 200 + 400.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(400), "{elapsed:?}");
    }
}
