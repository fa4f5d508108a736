//! Console configuration embedded in the host page.
//!
//! The page ships a `<script type="application/json" id="consolekit-config">`
//! block; every field is optional.

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use consolekit_guards::GuardPolicy;
use consolekit_loader::{LoaderConfig, RetryPolicy};

/// Element id of the embedded configuration block.
pub const CONFIG_ELEMENT_ID: &str = "consolekit-config";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub retry_budget: Option<u32>,
    pub retry_interval_ms: Option<u64>,
    pub reload_flag_key: Option<String>,
    pub guards: GuardPolicy,
}

impl WebConfig {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid consolekit configuration JSON")
    }

    /// Loader settings, starting from defaults.
    pub fn loader_config(&self) -> anyhow::Result<LoaderConfig> {
        let defaults = RetryPolicy::default();
        let retry = RetryPolicy::new(
            self.retry_budget.unwrap_or(defaults.retries()),
            self.retry_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval()),
        )
        .context("invalid retry policy")?;

        let mut config = LoaderConfig::default().with_retry(retry);
        if let Some(key) = self.reload_flag_key.as_deref() {
            config = config.with_reload_flag_key(key);
        }
        Ok(config)
    }
}
