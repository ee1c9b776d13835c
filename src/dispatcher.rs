//! # Dispatcher
//!
//! Turns matched parameters into a handler invocation. Handlers are
//! registered per module, either under an action name or under an HTTP
//! method. [`Dispatcher::dispatch_request`] reads `module` and `action`
//! from the request parameters; when the action is the name of the request
//! method (the REST routes set `action=put`, `action=delete`, ...) the
//! method handler is used, otherwise the named action.
//!
//! ```
//! use http::Method;
//! use serde_json::json;
//! use waymark::{Dispatcher, Request, Router};
//!
//! let router = Router::with_default_routes()?;
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register("users", "view", |req| Ok(json!({ "id": req.get("item") })));
//!
//! let mut req = Request::new(Method::GET, "/users/42");
//! req.route(&router)?;
//! assert_eq!(dispatcher.dispatch_request(&req)?, json!({ "id": "42" }));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use http::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::request::Request;

/// A handler: reads the request, returns a JSON body.
pub type Handler = Arc<dyn Fn(&Request) -> anyhow::Result<Value> + Send + Sync>;

/// Errors produced while resolving or running a handler.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request parameters lack `module` or `action`.
    #[error("request parameters do not name a module and an action")]
    MissingTarget,

    /// No handler was registered for the module.
    #[error("module '{0}' not found")]
    ModuleNotFound(String),

    /// The module has no handler for the action.
    #[error("module '{module}' does not have a callable handler '{action}'")]
    ActionNotFound {
        /// Normalised module name
        module: String,
        /// Requested action (or method)
        action: String,
    },

    /// The handler ran and failed.
    #[error("handler '{module}::{action}' failed")]
    Handler {
        /// Normalised module name
        module: String,
        /// Action (or method) that ran
        action: String,
        /// Error returned by the handler
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Clone, Default)]
struct ModuleHandlers {
    actions: HashMap<String, Handler>,
    methods: HashMap<Method, Handler>,
}

/// Registry of handlers keyed by module and action.
#[derive(Clone, Default)]
pub struct Dispatcher {
    modules: HashMap<String, ModuleHandlers>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

/// Canonical module name: characters outside `[A-Za-z0-9_]` are dropped,
/// each `_`-separated word is capitalised and words become path segments.
///
/// ```
/// assert_eq!(waymark::dispatcher::normalize_module("users"), "Users");
/// assert_eq!(waymark::dispatcher::normalize_module("blog_post"), "Blog::Post");
/// assert_eq!(waymark::dispatcher::normalize_module("../etc"), "Etc");
/// ```
#[must_use]
pub fn normalize_module(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    cleaned
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("::")
}

impl Dispatcher {
    /// Create an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a named action of a module.
    pub fn register<F>(&mut self, module: &str, action: &str, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.modules
            .entry(normalize_module(module))
            .or_default()
            .actions
            .insert(action.to_string(), Arc::new(handler));
        self
    }

    /// Register the handler a module runs when the routed action names the
    /// request method.
    pub fn register_method<F>(&mut self, module: &str, method: Method, handler: F) -> &mut Self
    where
        F: Fn(&Request) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.modules
            .entry(normalize_module(module))
            .or_default()
            .methods
            .insert(method, Arc::new(handler));
        self
    }

    /// Registered handlers as sorted `Module::action` / `Module::METHOD` names.
    #[must_use]
    pub fn handler_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .modules
            .iter()
            .flat_map(|(module, handlers)| {
                handlers
                    .actions
                    .keys()
                    .map(String::as_str)
                    .chain(handlers.methods.keys().map(Method::as_str))
                    .map(move |action| format!("{module}::{action}"))
            })
            .collect();
        names.sort();
        names
    }

    /// Invoke the handler for `module` / `action`.
    ///
    /// # Errors
    ///
    /// [`DispatchError::ModuleNotFound`], [`DispatchError::ActionNotFound`],
    /// or [`DispatchError::Handler`] wrapping the handler's own error.
    pub fn dispatch(&self, module: &str, action: &str, request: &Request) -> Result<Value, DispatchError> {
        let (module, handlers) = self.module(module)?;
        let handler = handlers.actions.get(action).ok_or_else(|| DispatchError::ActionNotFound {
            module: module.clone(),
            action: action.to_string(),
        })?;
        run(handler, &module, action, request)
    }

    /// Invoke the handler selected by the request's `module` and `action`
    /// parameters.
    ///
    /// # Errors
    ///
    /// [`DispatchError::MissingTarget`] if either parameter is missing or
    /// empty, otherwise as [`Dispatcher::dispatch`].
    pub fn dispatch_request(&self, request: &Request) -> Result<Value, DispatchError> {
        let (Some(module), Some(action)) = (request.get("module"), request.get("action")) else {
            return Err(DispatchError::MissingTarget);
        };

        if !action.eq_ignore_ascii_case(request.method().as_str()) {
            return self.dispatch(module, action, request);
        }

        let (module, handlers) = self.module(module)?;
        let handler = handlers
            .methods
            .get(request.method())
            .ok_or_else(|| DispatchError::ActionNotFound {
                module: module.clone(),
                action: request.method().to_string(),
            })?;
        run(handler, &module, request.method().as_str(), request)
    }

    fn module(&self, name: &str) -> Result<(String, &ModuleHandlers), DispatchError> {
        let module = normalize_module(name);
        match self.modules.get(&module) {
            Some(handlers) => Ok((module, handlers)),
            None => Err(DispatchError::ModuleNotFound(module)),
        }
    }
}

fn run(handler: &Handler, module: &str, action: &str, request: &Request) -> Result<Value, DispatchError> {
    debug!(
        module = %module,
        action = %action,
        method = %request.method(),
        path = %request.path(),
        "Dispatching request"
    );
    handler(request).map_err(|source| DispatchError::Handler {
        module: module.to_string(),
        action: action.to_string(),
        source,
    })
}
