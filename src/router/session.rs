//! Request-scoped match state.

use http::Method;

use super::core::{RouteMatch, Router};
use crate::error::RouterError;
use crate::route::Route;

/// Remembers which route the most recent match attempt settled on.
///
/// A session borrows its [`Router`] and belongs to a single request, so
/// concurrent requests sharing one router never see each other's state.
///
/// ```
/// use http::Method;
/// use waymark::Router;
///
/// let router = Router::with_default_routes()?;
/// let mut session = router.session();
/// assert!(session.matched_route().is_err());
///
/// session.match_request(&Method::GET, "/users/42")?;
/// assert_eq!(session.matched_route()?.name(), "module-item");
/// # Ok::<(), waymark::RouterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MatchSession<'r> {
    router: &'r Router,
    last_matched: Option<String>,
}

impl<'r> MatchSession<'r> {
    /// Create a session over `router`.
    #[must_use]
    pub fn new(router: &'r Router) -> Self {
        Self {
            router,
            last_matched: None,
        }
    }

    /// The router this session matches against.
    #[must_use]
    pub fn router(&self) -> &'r Router {
        self.router
    }

    /// Match a request and record the route it settled on.
    ///
    /// Every attempt overwrites the recorded route; a failed attempt leaves
    /// it empty.
    ///
    /// # Errors
    ///
    /// Same as [`Router::match_request`].
    pub fn match_request(&mut self, method: &Method, path: &str) -> Result<RouteMatch, RouterError> {
        self.router.resolve(method, path, &mut self.last_matched)
    }

    /// Name of the route recorded by the last match attempt.
    #[must_use]
    pub fn matched_route_name(&self) -> Option<&str> {
        self.last_matched.as_deref()
    }

    /// The route recorded by the last match attempt.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoMatchedRoute`] if no attempt in this session has
    /// matched.
    pub fn matched_route(&self) -> Result<&'r Route, RouterError> {
        self.last_matched
            .as_deref()
            .and_then(|name| self.router.get(name))
            .ok_or(RouterError::NoMatchedRoute)
    }
}
