//! # Runtime Configuration Module
//!
//! Environment-variable configuration for the `waymark` binary and for
//! applications that want the same conventions.
//!
//! ## Environment Variables
//!
//! ### `WAYMARK_ROUTES`
//!
//! Path to a route table file (`.yaml`, `.yml`, `.toml` or JSON). When unset
//! the default module/action table is used.
//!
//! ### `WAYMARK_STRICT_METHODS`
//!
//! When `true`, only `GET`, `POST`, `PUT`, `DELETE` and `HEAD` requests are
//! routed; anything else is refused before matching. Default: `false`.
//!
//! ## Usage
//!
//! ```rust
//! use waymark::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! let router = config.load_router()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use http::Method;
use std::env;
use std::path::PathBuf;

use crate::router::Router;
use crate::table::RouteTable;

/// Methods the request collaborator hands to the router in strict mode.
pub const SUPPORTED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::HEAD,
];

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Route table file, `None` for the default table
    pub routes_file: Option<PathBuf>,
    /// Refuse methods outside [`SUPPORTED_METHODS`]
    pub strict_methods: bool,
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let routes_file = env::var_os("WAYMARK_ROUTES")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let strict_methods = env::var("WAYMARK_STRICT_METHODS")
            .ok()
            .and_then(|value| parse_bool(&value))
            .unwrap_or(false);
        Self {
            routes_file,
            strict_methods,
        }
    }

    /// The configured route table, or the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file cannot be loaded.
    pub fn route_table(&self) -> anyhow::Result<RouteTable> {
        match &self.routes_file {
            Some(path) => RouteTable::load(path),
            None => Ok(RouteTable::default_table()),
        }
    }

    /// Build a router from [`RuntimeConfig::route_table`].
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded or a template is invalid.
    pub fn load_router(&self) -> anyhow::Result<Router> {
        let table = self.route_table()?;
        Ok(Router::from_table(&table)?)
    }

    /// Whether `method` may be routed under this configuration.
    #[must_use]
    pub fn allows(&self, method: &Method) -> bool {
        !self.strict_methods || SUPPORTED_METHODS.contains(method)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_strict_methods() {
        let lenient = RuntimeConfig::default();
        assert!(lenient.allows(&Method::PATCH));

        let strict = RuntimeConfig {
            strict_methods: true,
            ..Default::default()
        };
        assert!(strict.allows(&Method::HEAD));
        assert!(!strict.allows(&Method::PATCH));
    }

    #[test]
    fn test_default_table_when_no_file() {
        let router = RuntimeConfig::default().load_router().unwrap();
        assert_eq!(router.len(), 5);
    }
}
