//! # Route Tables
//!
//! Declarative route definitions that can be kept in a YAML, TOML or JSON
//! file and loaded into a [`Router`]. File order is matching priority.
//!
//! ```yaml
//! routes:
//!   - name: module-item
//!     path: /<:module>/<#item>
//!     defaults: { action: view, format: html }
//!     methods:
//!       PUT: { action: put }
//!       DELETE: { action: delete }
//!   - name: home
//!     path: /
//!     defaults: { module: Home, action: index, format: html }
//! ```
//!
//! Conditions and after-match callbacks are code, not data; attach them to
//! the loaded routes through [`Router::route`] or by looking routes up after
//! loading.

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::RouterError;
use crate::params::{param_map, ParamMap};
use crate::router::Router;

/// A single route definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    /// Unique route name
    pub name: String,
    /// Path template
    pub path: String,
    /// Route defaults
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub defaults: ParamMap,
    /// Per-method overrides, keyed by HTTP method
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub methods: IndexMap<String, ParamMap>,
}

impl RouteSpec {
    fn new(name: &str, path: &str, defaults: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            defaults: param_map(defaults.iter().copied()),
            methods: IndexMap::new(),
        }
    }

    fn method(mut self, method: &str, params: &[(&str, &str)]) -> Self {
        self.methods
            .insert(method.to_string(), param_map(params.iter().copied()));
        self
    }
}

/// An ordered list of route definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Routes in matching order
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

impl RouteTable {
    /// The conventional module/action route set.
    ///
    /// | name                 | template                      | defaults                                   |
    /// |----------------------|-------------------------------|--------------------------------------------|
    /// | `module-item`        | `/<:module>/<#item>`          | action=view; PUT→action=put; DELETE→action=delete |
    /// | `module-action-item` | `/<:module>/<:action>/<#item>`|                                            |
    /// | `module-action`      | `/<:module>/<:action>`        |                                            |
    /// | `module`             | `/<:module>`                  | action=index                               |
    /// | `home`               | `/`                           | module=Home, action=index                  |
    ///
    /// Every route also defaults `format=html`.
    #[must_use]
    pub fn default_table() -> Self {
        Self {
            routes: vec![
                RouteSpec::new(
                    "module-item",
                    "/<:module>/<#item>",
                    &[("action", "view"), ("format", "html")],
                )
                .method("PUT", &[("action", "put")])
                .method("DELETE", &[("action", "delete")]),
                RouteSpec::new(
                    "module-action-item",
                    "/<:module>/<:action>/<#item>",
                    &[("format", "html")],
                ),
                RouteSpec::new("module-action", "/<:module>/<:action>", &[("format", "html")]),
                RouteSpec::new(
                    "module",
                    "/<:module>",
                    &[("action", "index"), ("format", "html")],
                ),
                RouteSpec::new(
                    "home",
                    "/",
                    &[("module", "Home"), ("action", "index"), ("format", "html")],
                ),
            ],
        }
    }

    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid route table.
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse YAML route table")
    }

    /// Parse a TOML document (`[[routes]]` array of tables).
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid route table.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse TOML route table")
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a valid route table.
    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON route table")
    }

    /// Load a table from disk, choosing the format by extension:
    /// `.yaml`/`.yml`, `.toml`, anything else is read as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let table = match extension.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
        .with_context(|| format!("Invalid route table {}", path.display()))?;

        info!(
            source = %path.display(),
            routes_count = table.routes.len(),
            "Route table loaded"
        );
        Ok(table)
    }
}

impl Router {
    /// Build a router from a table, registering routes in table order.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidTemplate`] for the first template that fails
    /// to compile.
    pub fn from_table(table: &RouteTable) -> Result<Self, RouterError> {
        let mut router = Router::new();
        for spec in &table.routes {
            let route = router.route(&spec.name, &spec.path)?;
            route.defaults(spec.defaults.clone());
            for (method, params) in &spec.methods {
                route.method_defaults(method, params.clone());
            }
        }
        Ok(router)
    }

    /// Router with [`RouteTable::default_table`] registered.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature matches [`Router::from_table`].
    pub fn with_default_routes() -> Result<Self, RouterError> {
        Self::from_table(&RouteTable::default_table())
    }
}
