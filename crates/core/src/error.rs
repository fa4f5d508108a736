//! Storage error model.

use thiserror::Error;

/// Result type used by [`crate::DurableStorage`] implementations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the client-durable key/value store.
///
/// Callers in this workspace never propagate these to the user; they degrade
/// (reads become "absent", writes become no-ops) and log.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Storage is disabled or not reachable (private mode, no window, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused a write because it is full.
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),
}

impl StorageError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn quota_exceeded(msg: impl Into<String>) -> Self {
        Self::QuotaExceeded(msg.into())
    }

    /// Classify a browser `DOMException` raised by the store by its `name`.
    pub fn from_dom_exception(name: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match name {
            // Firefox reported the legacy name before adopting the standard one.
            "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED" => {
                Self::QuotaExceeded(format!("{name}: {message}"))
            }
            _ => Self::Unavailable(format!("{name}: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_exceptions_are_classified_by_name() {
        assert!(matches!(
            StorageError::from_dom_exception("QuotaExceededError", "storage full"),
            StorageError::QuotaExceeded(_)
        ));
        assert!(matches!(
            StorageError::from_dom_exception("NS_ERROR_DOM_QUOTA_REACHED", "full"),
            StorageError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn other_exceptions_mean_unavailable() {
        assert_eq!(
            StorageError::from_dom_exception("SecurityError", "access denied"),
            StorageError::Unavailable("SecurityError: access denied".to_string())
        );
        // Name match only; the message is not searched.
        assert!(matches!(
            StorageError::from_dom_exception("InvalidStateError", "QuotaExceeded"),
            StorageError::Unavailable(_)
        ));
    }
}
