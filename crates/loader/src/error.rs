//! Load error model.

use thiserror::Error;

/// A single module fetch failed (network blip, missing chunk, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("module fetch failed: {message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Terminal outcome of a resilient load.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// Every attempt in the retry budget failed; carries the last failure.
    #[error("module load failed after {attempts} attempts")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: FetchError,
    },

    /// The module still fails after the one forced reload for this incident.
    #[error("module unavailable after forced reload")]
    DeploymentSkew {
        #[source]
        source: FetchError,
    },

    /// The consumer was torn down while a retry was pending.
    ///
    /// Not a user-visible failure; consumers drop it silently.
    #[error("load abandoned by consumer")]
    Abandoned,
}

impl LoadError {
    pub fn is_abandoned(&self) -> bool {
        matches!(self, LoadError::Abandoned)
    }

    /// The underlying fetch failure, if any.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        match self {
            LoadError::RetryExhausted { source, .. } | LoadError::DeploymentSkew { source } => {
                Some(source)
            }
            LoadError::Abandoned => None,
        }
    }
}
