//! `consolekit-guards` — permission-gated rendering for protected views.
//!
//! Each guard is split in two:
//! - a pure decision function from auth state, abilities and route to a
//!   [`Rendering`] (plus an optional redirect), and
//! - a small stateful controller that memoizes what must be computed once
//!   and performs the navigation side effect through a [`Navigator`].
//!
//! [`Navigator`]: consolekit_core::Navigator

pub mod acl;
pub mod guest;
pub mod render;
pub mod routes;

pub use acl::{AclDecision, AclGuard, AclState, GuardDescriptor, decide_acl};
pub use guest::{GuestGuard, GuestState, decide_guest};
pub use render::Rendering;
pub use routes::{AdminArea, GuardPolicy};
