//! `consolekit-auth` — client-side view of authentication and abilities.
//!
//! The auth provider and the policy evaluator are external collaborators;
//! this crate defines the shapes the guards read from them, plus a default
//! role-based policy and the persisted-credential accessors.

pub mod ability;
pub mod credentials;
pub mod identity;
pub mod roles;
pub mod session;

pub use ability::{AbilityBuilder, AbilityContext, Action, RolePolicy, Rule, Subject};
pub use credentials::{CredentialError, CredentialKeys, CredentialStore};
pub use identity::Identity;
pub use roles::Role;
pub use session::{AuthSessionState, AuthStateSource};
