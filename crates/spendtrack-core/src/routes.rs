//! Static route table for the application shell.
//!
//! Every route is reachable at any time; there are no guards or redirects
//! based on session state.

/// A routed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Income,
    Expense,
    Category,
    Filter,
    Login,
    Signup,
}

impl Route {
    /// Route table in navigation order
    pub const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::Income,
        Route::Expense,
        Route::Category,
        Route::Filter,
        Route::Login,
        Route::Signup,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Income => "/income",
            Route::Expense => "/expense",
            Route::Category => "/category",
            Route::Filter => "/filter",
            Route::Login => "/login",
            Route::Signup => "/signup",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::Income => "Income",
            Route::Expense => "Expense",
            Route::Category => "Category",
            Route::Filter => "Filter",
            Route::Login => "Login",
            Route::Signup => "Sign Up",
        }
    }

    /// Look up a route by its path. Unknown paths have no page.
    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    pub fn is_auth_page(&self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }
}

/// Current location plus the history it was reached through
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Navigate to a route. Navigating to the current route is a no-op.
    pub fn navigate(&mut self, route: Route) {
        if route != self.current {
            self.history.push(self.current);
            self.current = route;
        }
    }

    /// Return to the previous route, if there is one
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }
}
