//! # Waymark
//!
//! **Waymark** is a declarative URL router. Routes are named path templates
//! with typed, optional and wildcard segments; the router matches a
//! `(method, path)` pair to the first route that accepts it and can turn a
//! route name plus parameters back into a URL.
//!
//! ## Template syntax
//!
//! | Token               | Matches                         |
//! |---------------------|---------------------------------|
//! | `<:name>`           | `[a-zA-Z0-9_\-+%\s]+`           |
//! | `<#name>`           | `[0-9]+`                        |
//! | `<*name>`           | `.*`                            |
//! | `<:name\|regex>`    | `regex`                         |
//! | `(prefix<:name>suffix)` | optional group around one token |
//!
//! ## Architecture
//!
//! - **[`route`]** - template compilation, structural matching, URL generation
//! - **[`router`]** - ordered route collection, request matching, reverse lookup
//! - **[`table`]** - route tables loaded from YAML, TOML or JSON
//! - **[`request`]** - the `(method, path)` side of a request plus its params
//! - **[`dispatcher`]** - module/action handler registry
//! - **[`otel`]** - `tracing` subscriber setup for the binary
//! - **[`runtime_config`]** - environment-driven configuration
//! - **[`cli`]** - the `waymark` command-line tool
//!
//! ## Quick start
//!
//! ```rust
//! use http::Method;
//! use waymark::{params::param_map, Router};
//!
//! let mut router = Router::new();
//! router
//!     .route("post", "/blog/<#year>/<:slug>(.<:format>)")?
//!     .defaults([("format", "html")]);
//! router.route("home", "/")?.defaults([("page", "home")]);
//!
//! let matched = router.match_request(&Method::GET, "/blog/2024/hello.json")?;
//! assert_eq!(matched.route_name, "post");
//! assert_eq!(matched.params["format"], "json");
//!
//! let url = router.url("post", &param_map([("year", "2024"), ("slug", "hello")]))?;
//! assert_eq!(url, "blog/2024/hello");
//! # Ok::<(), waymark::RouterError>(())
//! ```
//!
//! ## Matching
//!
//! Routes are tried in registration order. For `GET` requests matched URL
//! values override route and method defaults; for every other method the
//! method defaults win, so a `PUT` route can force `action=put` whatever the
//! URL said. A route's condition may veto a structural match, in which case
//! scanning continues with the next route. The after-match callback runs
//! once on the accepted match.
//!
//! ## Thread safety
//!
//! A [`Router`] is immutable while matching. Share it behind an `Arc` and
//! give each request its own [`MatchSession`] when the name of the last
//! matched route is needed.

pub mod cli;
pub mod dispatcher;
pub mod error;
pub mod otel;
pub mod params;
pub mod request;
pub mod route;
pub mod router;
pub mod runtime_config;
pub mod table;

pub use dispatcher::{DispatchError, Dispatcher};
pub use error::{ErrorKind, RouterError};
pub use params::ParamMap;
pub use request::Request;
pub use route::Route;
pub use router::{MatchSession, RouteMatch, Router};
pub use table::{RouteSpec, RouteTable};
