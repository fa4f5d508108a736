//! `consolekit-core` — shared primitives for the admin console shell.
//!
//! This crate holds the narrow collaborator interfaces (durable storage,
//! navigation) plus in-memory implementations usable outside a browser.

pub mod error;
pub mod id;
pub mod navigation;
pub mod storage;

pub use error::{StorageError, StorageResult};
pub use id::UserId;
pub use navigation::{MemoryNavigator, Navigator};
pub use storage::{DurableStorage, MemoryStorage};
