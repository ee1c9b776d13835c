//! The request side of routing: a normalised `(method, path)` pair plus the
//! parameters a match produced.

use http::Method;
use url::form_urlencoded;

use crate::error::RouterError;
use crate::params::ParamMap;
use crate::router::{RouteMatch, Router};

/// A request as seen by the router and the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    uri: String,
    path: String,
    query: ParamMap,
    params: ParamMap,
}

impl Request {
    /// Build a request from a method and a request URI.
    ///
    /// The query string is split off and decoded into [`Request::query`];
    /// the remaining path gets exactly one leading slash and no trailing one.
    ///
    /// ```
    /// use http::Method;
    /// use waymark::Request;
    ///
    /// let req = Request::new(Method::GET, "users/42/?tab=posts");
    /// assert_eq!(req.path(), "/users/42");
    /// assert_eq!(req.query()["tab"], "posts");
    /// ```
    #[must_use]
    pub fn new(method: Method, uri: &str) -> Self {
        let (raw_path, raw_query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (uri, None),
        };
        let query = raw_query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self {
            method,
            uri: uri.to_string(),
            path: format!("/{}", raw_path.trim_matches('/')),
            query,
            params: ParamMap::new(),
        }
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The URI exactly as given.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Normalised path, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Decoded query string parameters.
    #[must_use]
    pub fn query(&self) -> &ParamMap {
        &self.query
    }

    /// Route parameters set on this request.
    #[must_use]
    pub fn params(&self) -> &ParamMap {
        &self.params
    }

    /// Look a value up by name: the known fields `method`, `path` and `uri`
    /// first, then the route parameters.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            "method" => Some(self.method.as_str()),
            "path" => Some(self.path.as_str()),
            "uri" => Some(self.uri.as_str()),
            _ => self
                .params
                .get(name)
                .map(String::as_str)
                .filter(|value| !value.is_empty()),
        }
    }

    /// Set (or overwrite) a single parameter.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    /// Add parameters; keys that are already set keep their value.
    pub fn set_params(&mut self, params: ParamMap) {
        for (key, value) in params {
            self.params.entry(key).or_insert(value);
        }
    }

    /// Match this request against `router` and store the resulting params.
    ///
    /// # Errors
    ///
    /// Same as [`Router::match_request`].
    pub fn route(&mut self, router: &Router) -> Result<RouteMatch, RouterError> {
        let matched = router.match_request(&self.method, &self.path)?;
        self.set_params(matched.params.clone());
        Ok(matched)
    }

    /// `true` for `GET` requests.
    #[must_use]
    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// `true` for `POST` requests.
    #[must_use]
    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// `true` for `PUT` requests.
    #[must_use]
    pub fn is_put(&self) -> bool {
        self.method == Method::PUT
    }

    /// `true` for `DELETE` requests.
    #[must_use]
    pub fn is_delete(&self) -> bool {
        self.method == Method::DELETE
    }

    /// `true` for `HEAD` requests.
    #[must_use]
    pub fn is_head(&self) -> bool {
        self.method == Method::HEAD
    }
}
