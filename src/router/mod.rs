//! # Router Module
//!
//! The router holds an ordered, named collection of [`Route`](crate::Route)s,
//! matches `(method, path)` pairs against them and turns route names plus
//! parameter values back into URLs.
//!
//! ## Matching
//!
//! 1. The path is trimmed of slashes.
//! 2. Routes are tried in registration order. Static routes compare the
//!    path literally; dynamic routes run their compiled regex.
//! 3. A structural match is merged with the route defaults and method
//!    overrides (see [`Route::extract`](crate::Route::extract)).
//! 4. The route's condition predicate, if any, may veto the match, in which
//!    case scanning continues with the next route.
//! 5. The first accepted route wins; its after-match callback, if any,
//!    replaces the parameters.
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use waymark::Router;
//!
//! let router = Router::with_default_routes()?;
//!
//! let matched = router.match_request(&Method::GET, "/users/42")?;
//! assert_eq!(matched.route_name, "module-item");
//! assert_eq!(matched.get("action"), Some("view"));
//!
//! let matched = router.match_request(&Method::PUT, "/users/42")?;
//! assert_eq!(matched.get("action"), Some("put"));
//! # Ok::<(), waymark::RouterError>(())
//! ```

mod core;
mod session;

pub use self::core::{RouteMatch, Router};
pub use session::MatchSession;
