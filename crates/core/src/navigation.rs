//! Navigation context consumed by the guards.

use std::cell::{Cell, RefCell};

/// Router handle: readiness, the current route, and replace-navigation.
pub trait Navigator {
    /// Whether the router has resolved enough state to evaluate guards.
    fn is_ready(&self) -> bool;

    fn current_route(&self) -> String;

    /// Replace the current history entry with `path`.
    fn replace(&self, path: &str);
}

/// In-memory navigator that records every `replace` call.
#[derive(Debug)]
pub struct MemoryNavigator {
    ready: Cell<bool>,
    route: RefCell<String>,
    replaced: RefCell<Vec<String>>,
}

impl MemoryNavigator {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            ready: Cell::new(true),
            route: RefCell::new(route.into()),
            replaced: RefCell::new(Vec::new()),
        }
    }

    /// A navigator that has not finished resolving yet.
    pub fn pending(route: impl Into<String>) -> Self {
        let nav = Self::new(route);
        nav.set_ready(false);
        nav
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.set(ready);
    }

    /// Simulate the user navigating (push) to `route`.
    pub fn visit(&self, route: impl Into<String>) {
        *self.route.borrow_mut() = route.into();
    }

    /// Every path passed to `replace`, oldest first.
    pub fn replaced(&self) -> Vec<String> {
        self.replaced.borrow().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    fn current_route(&self) -> String {
        self.route.borrow().clone()
    }

    fn replace(&self, path: &str) {
        self.replaced.borrow_mut().push(path.to_string());
        *self.route.borrow_mut() = path.to_string();
    }
}
