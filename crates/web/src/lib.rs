//! `consolekit-web`
//!
//! **Responsibility:** browser bindings for the console shell.
//!
//! This crate provides:
//! - `localStorage`, `location.reload()` and `setTimeout` implementations of
//!   the storage, reloader and timer interfaces (wasm32 only)
//! - Leptos components wrapping the access guards and the resilient loader
//!   (wasm32 only)
//! - Page-embedded configuration parsing (all targets)

pub mod config;

#[cfg(target_arch = "wasm32")]
pub mod browser;
#[cfg(target_arch = "wasm32")]
pub mod frontend;

pub use config::WebConfig;
