//! Loader configuration.

use std::time::Duration;

use thiserror::Error;

use crate::reload::DEFAULT_RELOAD_FLAG_KEY;
use crate::retry::RetryPolicy;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("retry interval must be positive")]
    ZeroInterval,
}

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub retry: RetryPolicy,
    /// Durable-storage key of the forced-reload flag.
    pub reload_flag_key: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            reload_flag_key: DEFAULT_RELOAD_FLAG_KEY.to_string(),
        }
    }
}

impl LoaderConfig {
    pub const ENV_RETRY_BUDGET: &'static str = "CONSOLEKIT_RETRY_BUDGET";
    pub const ENV_RETRY_INTERVAL_MS: &'static str = "CONSOLEKIT_RETRY_INTERVAL_MS";
    pub const ENV_RELOAD_FLAG_KEY: &'static str = "CONSOLEKIT_RELOAD_FLAG_KEY";

    /// Defaults overridden by `CONSOLEKIT_*` environment variables.
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(Self::ENV_RETRY_BUDGET) {
            match raw.trim().parse::<u32>() {
                Ok(retries) => config.retry = config.retry.with_retries(retries),
                Err(err) => {
                    tracing::warn!(
                        var = Self::ENV_RETRY_BUDGET,
                        value = %raw,
                        error = %err,
                        "ignoring invalid retry budget"
                    )
                }
            }
        }

        if let Some(raw) = lookup(Self::ENV_RETRY_INTERVAL_MS) {
            let retries = config.retry.retries();
            let parsed = raw
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|ms| RetryPolicy::new(retries, Duration::from_millis(ms)).ok());
            match parsed {
                Some(policy) => config.retry = policy,
                None => {
                    tracing::warn!(
                        var = Self::ENV_RETRY_INTERVAL_MS,
                        value = %raw,
                        "ignoring invalid retry interval"
                    )
                }
            }
        }

        if let Some(key) = lookup(Self::ENV_RELOAD_FLAG_KEY).filter(|k| !k.trim().is_empty()) {
            config.reload_flag_key = key;
        }

        config
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_reload_flag_key(mut self, key: impl Into<String>) -> Self {
        self.reload_flag_key = key.into();
        self
    }
}
