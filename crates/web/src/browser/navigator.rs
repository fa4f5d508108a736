use std::rc::Rc;

use leptos::SignalGetUntracked;
use leptos_router::{Location, NavigateOptions, use_location, use_navigate};

use consolekit_core::Navigator;

/// [`Navigator`] over the surrounding Leptos router.
///
/// Must be created inside a `<Router>`. The router has resolved the location
/// by the time any route view runs, so it always reports ready.
#[derive(Clone)]
pub struct RouterNavigator {
    location: Location,
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    pub fn new() -> Self {
        let navigate = use_navigate();
        Self {
            location: use_location(),
            navigate: Rc::new(move |path: &str, options: NavigateOptions| navigate(path, options)),
        }
    }
}

impl Navigator for RouterNavigator {
    fn is_ready(&self) -> bool {
        true
    }

    fn current_route(&self) -> String {
        self.location.pathname.get_untracked()
    }

    fn replace(&self, path: &str) {
        let options = NavigateOptions {
            replace: true,
            ..Default::default()
        };
        (self.navigate)(path, options);
    }
}
