//! Persisted session credentials (access token + identity record).
//!
//! Login writes both keys, logout clears both. The guest guard only asks
//! whether both are present.

use std::rc::Rc;

use thiserror::Error;

use consolekit_core::{DurableStorage, StorageError};

use crate::Identity;

/// Storage keys for the persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialKeys {
    pub access_token: String,
    pub user_data: String,
}

impl Default for CredentialKeys {
    fn default() -> Self {
        Self {
            access_token: "accessToken".to_string(),
            user_data: "userData".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode identity record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct CredentialStore {
    storage: Rc<dyn DurableStorage>,
    keys: CredentialKeys,
}

impl core::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new(storage: Rc<dyn DurableStorage>) -> Self {
        Self::with_keys(storage, CredentialKeys::default())
    }

    pub fn with_keys(storage: Rc<dyn DurableStorage>, keys: CredentialKeys) -> Self {
        Self { storage, keys }
    }

    pub fn keys(&self) -> &CredentialKeys {
        &self.keys
    }

    /// Persist a freshly authenticated session.
    ///
    /// Either both keys are written or neither is: a failed identity write
    /// rolls back the token.
    pub fn save(&self, identity: &Identity, access_token: &str) -> Result<(), CredentialError> {
        let encoded = serde_json::to_string(identity)?;
        self.storage.set(&self.keys.access_token, access_token)?;

        if let Err(err) = self.storage.set(&self.keys.user_data, &encoded) {
            if let Err(rollback) = self.storage.remove(&self.keys.access_token) {
                tracing::warn!(error = %rollback, "failed to roll back access token");
            }
            return Err(err.into());
        }
        Ok(())
    }

    pub fn access_token(&self) -> Option<String> {
        self.read(&self.keys.access_token)
    }

    /// The persisted identity, if present and decodable.
    pub fn identity(&self) -> Option<Identity> {
        let raw = self.read(&self.keys.user_data)?;
        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(err) => {
                tracing::warn!(error = %err, "persisted identity record is not valid JSON");
                None
            }
        }
    }

    /// Whether both an access credential and an identity record are stored.
    ///
    /// Presence only; the identity record is not decoded here.
    pub fn has_persisted_session(&self) -> bool {
        self.read(&self.keys.access_token).is_some() && self.read(&self.keys.user_data).is_some()
    }

    /// Remove both keys. Storage failures are logged, not returned.
    pub fn clear(&self) {
        for key in [&self.keys.user_data, &self.keys.access_token] {
            if let Err(err) = self.storage.remove(key) {
                tracing::warn!(key = %key, error = %err, "failed to clear persisted credential");
            }
        }
    }

    /// Non-empty value for `key`; unavailable storage reads as absent.
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "credential storage unavailable");
                None
            }
        }
    }
}
