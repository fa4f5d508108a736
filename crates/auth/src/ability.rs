//! Capability model consumed by the access guard.
//!
//! An [`AbilityContext`] is a list of `(action, subject)` rules built for one
//! role. `manage` and `all` act as wildcards on their respective axis.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::Role;

/// Action identifier (e.g. "read", "update").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(Cow<'static, str>);

impl Action {
    /// Wildcard: any action.
    pub const MANAGE: Action = Action(Cow::Borrowed("manage"));
    pub const READ: Action = Action(Cow::Borrowed("read"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::MANAGE
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Subject identifier (e.g. "product", "order").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(Cow<'static, str>);

impl Subject {
    /// Wildcard: every subject.
    pub const ALL: Subject = Subject(Cow::Borrowed("all"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        *self == Self::ALL
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One granted `(action, subject)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub action: Action,
    pub subject: Subject,
}

impl Rule {
    pub fn new(action: Action, subject: Subject) -> Self {
        Self { action, subject }
    }

    fn matches(&self, action: &Action, subject: &Subject) -> bool {
        let action_ok = self.action.is_wildcard() || self.action == *action;
        let subject_ok = self.subject.is_wildcard() || self.subject == *subject;
        action_ok && subject_ok
    }
}

/// Abilities of one identity. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityContext {
    role: Role,
    rules: Vec<Rule>,
}

impl AbilityContext {
    pub fn new(role: Role, rules: Vec<Rule>) -> Self {
        Self { role, rules }
    }

    /// Context that grants nothing.
    pub fn empty(role: Role) -> Self {
        Self::new(role, Vec::new())
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether any rule grants `action` on `subject`.
    pub fn can(&self, action: &Action, subject: &Subject) -> bool {
        self.rules.iter().any(|r| r.matches(action, subject))
    }

    pub fn cannot(&self, action: &Action, subject: &Subject) -> bool {
        !self.can(action, subject)
    }
}

/// Builds an [`AbilityContext`] for a role and the subject a view asks about.
///
/// Implementations must be pure: same inputs, same context.
pub trait AbilityBuilder {
    fn build(&self, role: &Role, subject: &Subject) -> AbilityContext;
}

impl<F> AbilityBuilder for F
where
    F: Fn(&Role, &Subject) -> AbilityContext,
{
    fn build(&self, role: &Role, subject: &Subject) -> AbilityContext {
        self(role, subject)
    }
}

/// Default console policy.
///
/// - `ADMIN` may `manage` `all`.
/// - Any other role may `read` the requested subject and nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolePolicy;

impl AbilityBuilder for RolePolicy {
    fn build(&self, role: &Role, subject: &Subject) -> AbilityContext {
        let rules = if role.is_admin() {
            vec![Rule::new(Action::MANAGE, Subject::ALL)]
        } else {
            vec![Rule::new(Action::READ, subject.clone())]
        };
        AbilityContext::new(role.clone(), rules)
    }
}
