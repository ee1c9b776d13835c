//! Router core module - match orchestration and reverse lookup.

use http::Method;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use super::session::MatchSession;
use crate::error::RouterError;
use crate::params::ParamMap;
use crate::route::Route;

/// Result of successfully matching a request to a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Name of the route that accepted the request
    pub route_name: String,
    /// Merged, decoded (and possibly callback-transformed) parameters
    pub params: ParamMap,
}

impl RouteMatch {
    /// Get a parameter by name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The `module` parameter the dispatcher resolves handlers with.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.get("module")
    }

    /// The `action` parameter the dispatcher resolves handlers with.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.get("action")
    }

    /// Consume the match, keeping only the parameters.
    #[must_use]
    pub fn into_params(self) -> ParamMap {
        self.params
    }
}

/// Ordered, named collection of [`Route`]s.
///
/// Registration order is matching priority: the first route that matches
/// structurally and passes its condition wins, regardless of how specific
/// later routes are.
///
/// The router holds no per-request state, so one instance can serve
/// concurrent matches behind a shared reference. The "last matched route"
/// is tracked by a [`MatchSession`] instead.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: IndexMap<String, Route>,
}

impl Router {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `template` under `name` and return the route for chained
    /// configuration.
    ///
    /// Registering an existing name replaces that route in place: the new
    /// route takes over the old one's position in the matching order.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidTemplate`] if the template cannot be compiled.
    pub fn route(&mut self, name: &str, template: &str) -> Result<&mut Route, RouterError> {
        let route = Route::new(name, template)?;
        trace!(
            route = %name,
            template = %template,
            is_static = route.is_static(),
            pattern = ?route.pattern(),
            "Route registered"
        );
        let slot = match self.routes.entry(name.to_string()) {
            Entry::Occupied(mut entry) => {
                entry.insert(route);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(route),
        };
        Ok(slot)
    }

    /// Routes in matching order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    /// Look up a route by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// `true` when no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Remove every route.
    pub fn reset(&mut self) {
        self.routes.clear();
    }

    /// Start a request-scoped session that remembers the last matched route.
    #[must_use]
    pub fn session(&self) -> MatchSession<'_> {
        MatchSession::new(self)
    }

    /// Match a request against the routes in registration order.
    ///
    /// # Errors
    ///
    /// - [`RouterError::NoRoutes`] if nothing is registered
    /// - [`RouterError::CaptureMismatch`] if a route's captures are inconsistent
    /// - [`RouterError::NotFound`] if no route accepted the request
    pub fn match_request(&self, method: &Method, path: &str) -> Result<RouteMatch, RouterError> {
        let mut last_matched = None;
        self.resolve(method, path, &mut last_matched)
    }

    /// The matching loop shared by [`Router::match_request`] and
    /// [`MatchSession::match_request`].
    ///
    /// `last_matched` is cleared up front, set as soon as a route matches
    /// structurally and cleared again if that route's condition rejects it.
    pub(crate) fn resolve(
        &self,
        method: &Method,
        path: &str,
        last_matched: &mut Option<String>,
    ) -> Result<RouteMatch, RouterError> {
        if self.routes.is_empty() {
            return Err(RouterError::NoRoutes);
        }

        let path = path.trim_matches('/');
        *last_matched = None;

        debug!(
            method = %method,
            path = %path,
            routes_count = self.routes.len(),
            "Route match attempt"
        );
        let match_start = Instant::now();

        let mut accepted = None;
        for (name, route) in &self.routes {
            let Some(params) = route.extract(method, path)? else {
                continue;
            };
            *last_matched = Some(name.clone());

            if !route.accepts(&params, method, path) {
                trace!(route = %name, method = %method, path = %path, "Route condition rejected match");
                *last_matched = None;
                continue;
            }

            accepted = Some((route, params));
            break;
        }

        let match_duration = match_start.elapsed();

        let Some((route, params)) = accepted else {
            debug!(
                method = %method,
                path = %path,
                duration_us = match_duration.as_micros(),
                "No route matched"
            );
            return Err(RouterError::NotFound {
                method: method.to_string(),
                path: path.to_string(),
            });
        };

        let params = route.after_match(params, method, path);

        if match_duration > Duration::from_millis(1) {
            warn!(
                method = %method,
                path = %path,
                route = %route.name(),
                duration_us = match_duration.as_micros(),
                "Slow route matching detected"
            );
        } else {
            debug!(
                method = %method,
                path = %path,
                route = %route.name(),
                params = ?params,
                duration_us = match_duration.as_micros(),
                "Route matched"
            );
        }

        Ok(RouteMatch {
            route_name: route.name().to_string(),
            params,
        })
    }

    /// Generate the URL path for the route called `name`.
    ///
    /// The route defaults form the base parameter set and `params` are laid
    /// over them; see [`Route::generate`] for how optional groups behave.
    ///
    /// # Errors
    ///
    /// - [`RouterError::UnknownRoute`] if no route has that name
    /// - [`RouterError::MissingParameter`] if a required value is missing
    pub fn url(&self, name: &str, params: &ParamMap) -> Result<String, RouterError> {
        let route = self
            .routes
            .get(name)
            .ok_or_else(|| RouterError::UnknownRoute(name.to_string()))?;
        route.generate(params)
    }

    /// [`Router::url`] without parameters, for static routes and routes
    /// whose parameters all have defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Router::url`].
    pub fn url_for(&self, name: &str) -> Result<String, RouterError> {
        self.url(name, &ParamMap::new())
    }
}
