//! Route table and authentication guard.
//!
//! The guard inspects local session state only; nothing here talks to the
//! backend.

use std::fmt;

/// Client routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/`, the authenticated dashboard root.
    Dashboard,
    /// `/visualization`
    Visualization,
    /// `/fetch`
    Fetch,
    /// `/risk`
    Risk,
    /// Any other path.
    Unmatched(String),
}

impl Route {
    /// Parses a path. Trailing slashes are ignored.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };

        match normalized {
            "/" => Route::Dashboard,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/visualization" => Route::Visualization,
            "/fetch" => Route::Fetch,
            "/risk" => Route::Risk,
            _ => Route::Unmatched(trimmed.to_string()),
        }
    }

    /// Canonical path.
    pub fn path(&self) -> &str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/",
            Route::Visualization => "/visualization",
            Route::Fetch => "/fetch",
            Route::Risk => "/risk",
            Route::Unmatched(path) => path,
        }
    }

    /// Returns `true` for routes that require a session.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard | Route::Visualization | Route::Fetch | Route::Risk
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested view.
    Render(Route),
    /// Navigate elsewhere instead.
    Redirect(Route),
}

impl RouteDecision {
    /// Route that ends up on screen.
    pub fn target(&self) -> &Route {
        match self {
            RouteDecision::Render(route) | RouteDecision::Redirect(route) => route,
        }
    }
}

/// Decides what a navigation to `route` shows.
pub fn guard(route: Route, authenticated: bool) -> RouteDecision {
    match route {
        Route::Login | Route::Register if authenticated => RouteDecision::Redirect(Route::Dashboard),
        Route::Login | Route::Register => RouteDecision::Render(route),
        Route::Unmatched(_) if authenticated => RouteDecision::Redirect(Route::Dashboard),
        Route::Unmatched(_) => RouteDecision::Redirect(Route::Login),
        protected if authenticated => RouteDecision::Render(protected),
        _ => RouteDecision::Redirect(Route::Login),
    }
}
