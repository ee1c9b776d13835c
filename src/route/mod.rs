//! # Route Module
//!
//! A [`Route`] is one compiled path template. Compilation happens once, when
//! the route is registered; afterwards the route is read-only configuration
//! apart from its builder-style setters.
//!
//! ## Template language
//!
//! Segments are separated by `/`; leading and trailing slashes are ignored.
//!
//! - `<:name>` generic segment (`[a-zA-Z0-9_\-+%\s]+`)
//! - `<#name>` numeric segment (`[0-9]+`)
//! - `<*name>` wildcard (`.*`), typically the rest of the path
//! - `<:name|pattern>` segment matched by an inline regex
//! - `(prefix<:name>suffix)` optional group around exactly one token
//!
//! A template without tokens is *static* and is matched by string equality,
//! skipping the regex engine.
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use waymark::Route;
//!
//! let mut route = Route::new("post", "/blog/<#year>/<:slug>(.<:format>)")?;
//! route.defaults([("format", "html")]);
//!
//! let params = route.extract(&Method::GET, "/blog/2024/hello-world")?.unwrap();
//! assert_eq!(params["year"], "2024");
//! assert_eq!(params["format"], "html");
//! # Ok::<(), waymark::RouterError>(())
//! ```

mod core;
mod pattern;
mod reverse;

pub use self::core::{AfterMatch, Condition, Route};
pub use pattern::{OptionalSegment, ParamKind, GENERIC_CLASS, NUMERIC_CLASS, WILDCARD_CLASS};
