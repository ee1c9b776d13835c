//! Error types returned by route compilation, matching and URL generation.
//!
//! Every failure is synchronous and handed straight back to the caller. A
//! condition predicate vetoing a route is *not* an error: the router simply
//! moves on to the next route.

use thiserror::Error;

/// Broad category of a [`RouterError`].
///
/// Useful for callers that map routing failures onto responses (a
/// `NotFound` becomes a 404, a `Configuration` problem a 500, and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The route set itself is unusable (no routes, malformed template).
    Configuration,
    /// Nothing matched the request, or a route name is unknown.
    NotFound,
    /// A stateful query was made before the state existed.
    State,
    /// A caller-supplied value is missing or unusable.
    Value,
}

/// Errors produced by [`Route`](crate::Route) and [`Router`](crate::Router).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// `match_request` was called on a router with no routes.
    #[error("there must be at least one route defined to match against")]
    NoRoutes,

    /// A structural match produced a different number of captures than the
    /// route has named parameters.
    #[error("error matching URL to params of route '{route}': matched({matched}) != named({named})")]
    CaptureMismatch {
        /// Route whose pattern produced the inconsistent captures
        route: String,
        /// Number of parameter groups that participated in the match
        matched: usize,
        /// Number of parameters the route expected to be filled
        named: usize,
    },

    /// The template could not be compiled.
    #[error("invalid route template '{template}': {reason}")]
    InvalidTemplate {
        /// The template as registered
        template: String,
        /// What is wrong with it
        reason: String,
    },

    /// No registered route matched the request.
    #[error("no route matched {method} /{path}")]
    NotFound {
        /// Request method
        method: String,
        /// Request path, trimmed of slashes
        path: String,
    },

    /// Reverse lookup of a route name that was never registered.
    #[error("route '{0}' not found in defined routes")]
    UnknownRoute(String),

    /// The last matched route was requested before any route matched.
    #[error("unable to return last matched route: no route has been matched yet")]
    NoMatchedRoute,

    /// URL generation is missing a value for a required parameter.
    #[error("error creating URL for route '{route}': required route parameter '{param}' has not been supplied")]
    MissingParameter {
        /// Route being generated
        route: String,
        /// Parameter without value or default
        param: String,
    },
}

impl RouterError {
    /// Category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::NoRoutes
            | RouterError::CaptureMismatch { .. }
            | RouterError::InvalidTemplate { .. } => ErrorKind::Configuration,
            RouterError::NotFound { .. } | RouterError::UnknownRoute(_) => ErrorKind::NotFound,
            RouterError::NoMatchedRoute => ErrorKind::State,
            RouterError::MissingParameter { .. } => ErrorKind::Value,
        }
    }

    pub(crate) fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(RouterError::NoRoutes.kind(), ErrorKind::Configuration);
        assert_eq!(
            RouterError::UnknownRoute("x".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(RouterError::NoMatchedRoute.kind(), ErrorKind::State);
        assert_eq!(
            RouterError::MissingParameter {
                route: "r".into(),
                param: "p".into()
            }
            .kind(),
            ErrorKind::Value
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = RouterError::NotFound {
            method: "GET".into(),
            path: "nope".into(),
        };
        assert_eq!(err.to_string(), "no route matched GET /nope");
    }
}
