//! Route table consulted by the guards.

use serde::{Deserialize, Serialize};

use consolekit_auth::Role;

/// Optional gate that reserves a route prefix for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminArea {
    pub prefix: String,
    pub admin_role: Role,
    /// Where authenticated non-admins are sent.
    pub unauthorized_route: String,
}

impl Default for AdminArea {
    fn default() -> Self {
        Self {
            prefix: "/admin".to_string(),
            admin_role: Role::ADMIN,
            unauthorized_route: "/401".to_string(),
        }
    }
}

impl AdminArea {
    /// Segment-aware prefix match: `/admin` and `/admin/users`, not `/administrator`.
    pub fn contains(&self, route: &str) -> bool {
        match route.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

/// Guard configuration; deserializable with every field optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardPolicy {
    /// Application root; target of the guest redirect.
    pub root_route: String,

    /// Error pages every visitor may see (matched exactly).
    pub public_routes: Vec<String>,

    pub admin_area: Option<AdminArea>,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            root_route: "/".to_string(),
            public_routes: vec!["/404".to_string(), "/500".to_string()],
            admin_area: None,
        }
    }
}

impl GuardPolicy {
    pub fn with_root_route(mut self, route: impl Into<String>) -> Self {
        self.root_route = route.into();
        self
    }

    pub fn with_public_route(mut self, route: impl Into<String>) -> Self {
        self.public_routes.push(route.into());
        self
    }

    pub fn with_admin_area(mut self, area: AdminArea) -> Self {
        self.admin_area = Some(area);
        self
    }

    pub fn is_public_route(&self, route: &str) -> bool {
        self.public_routes.iter().any(|r| r == route)
    }

    pub fn is_root(&self, route: &str) -> bool {
        route == self.root_route
    }
}
