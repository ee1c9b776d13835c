//! Compiled route: metadata, builder-style setters and structural matching.

use http::Method;
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

use super::pattern::{compile, group_name, OptionalSegment, ParamKind};
use crate::error::RouterError;
use crate::params::{decode, ParamMap};

/// Predicate that can veto an otherwise successful structural match.
///
/// Receives the merged parameters, the request method and the trimmed path.
pub type Condition = Arc<dyn Fn(&ParamMap, &Method, &str) -> bool + Send + Sync>;

/// Transform applied to the parameters of the accepted match.
///
/// Its return value replaces the parameters entirely.
pub type AfterMatch = Arc<dyn Fn(ParamMap, &Method, &str) -> ParamMap + Send + Sync>;

/// One compiled path template plus its defaults, optional-group metadata
/// and hooks.
///
/// Routes are created through [`Router::route`](crate::Router::route) and
/// configured with the chained setters:
///
/// ```
/// use waymark::Router;
///
/// let mut router = Router::new();
/// router
///     .route("module-item", "/<:module>/<#item>")?
///     .defaults([("action", "view"), ("format", "html")])
///     .put([("action", "put")])
///     .delete([("action", "delete")]);
/// # Ok::<(), waymark::RouterError>(())
/// ```
#[derive(Clone)]
pub struct Route {
    name: String,
    template: String,
    matcher: Option<Regex>,
    named_params: IndexMap<String, String>,
    kinds: Vec<ParamKind>,
    optional_params: IndexMap<String, OptionalSegment>,
    default_params: ParamMap,
    method_params: IndexMap<String, ParamMap>,
    condition: Option<Condition>,
    callback: Option<AfterMatch>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("pattern", &self.pattern())
            .field("named_params", &self.named_params)
            .field("optional_params", &self.optional_params)
            .field("default_params", &self.default_params)
            .field("method_params", &self.method_params)
            .field("condition", &self.condition.is_some())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

fn collect<I, K, V>(params: I) -> ParamMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

fn overlay<'a>(slots: &mut IndexMap<&'a str, Option<&'a str>>, layer: Option<&'a ParamMap>) {
    for (key, value) in layer.into_iter().flatten() {
        slots.insert(key.as_str(), Some(value.as_str()));
    }
}

impl Route {
    /// Compile `template` into a route called `name`.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidTemplate`] when an optional group holds more
    /// than one parameter or is nested, when a parameter name repeats, or
    /// when an inline pattern is not a valid regex.
    pub fn new(name: impl Into<String>, template: &str) -> Result<Self, RouterError> {
        let compiled = compile(template)?;
        Ok(Self {
            name: name.into(),
            template: compiled.template,
            matcher: compiled.matcher,
            named_params: compiled.named_params,
            kinds: compiled.kinds,
            optional_params: compiled.optional_params,
            default_params: ParamMap::new(),
            method_params: IndexMap::new(),
            condition: None,
            callback: None,
        })
    }

    /// Name the route was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template text, trimmed of leading and trailing slashes.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// `true` when the template has no parameters and matches by equality.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.matcher.is_none()
    }

    /// Source of the compiled regex, `None` for static routes.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.matcher.as_ref().map(Regex::as_str)
    }

    /// Parameter name to raw token (`<:module>`), in template order.
    #[must_use]
    pub fn named_params(&self) -> &IndexMap<String, String> {
        &self.named_params
    }

    /// How the named parameter is matched.
    #[must_use]
    pub fn param_kind(&self, name: &str) -> Option<&ParamKind> {
        self.named_params
            .get_index_of(name)
            .and_then(|index| self.kinds.get(index))
    }

    /// Optional groups keyed by the parameter they wrap.
    #[must_use]
    pub fn optional_params(&self) -> &IndexMap<String, OptionalSegment> {
        &self.optional_params
    }

    /// Route defaults.
    #[must_use]
    pub fn default_params(&self) -> &ParamMap {
        &self.default_params
    }

    /// Overrides applied for `method`, if any were set.
    #[must_use]
    pub fn method_params(&self, method: &str) -> Option<&ParamMap> {
        self.method_params.get(&method.to_ascii_uppercase())
    }

    /// Every optional parameter paired with its default value, if it has one.
    #[must_use]
    pub fn optional_param_defaults(&self) -> IndexMap<&str, Option<&str>> {
        self.optional_params
            .keys()
            .map(|name| {
                (
                    name.as_str(),
                    self.default_params.get(name).map(String::as_str),
                )
            })
            .collect()
    }

    /// Whether a condition predicate is set.
    #[must_use]
    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    /// Whether an after-match callback is set.
    #[must_use]
    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    /// Replace the route defaults. An empty input leaves them untouched.
    pub fn defaults<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let params = collect(params);
        if !params.is_empty() {
            self.default_params = params;
        }
        self
    }

    /// Add overrides applied only when the request method is `method`.
    ///
    /// The method is upper-cased. Keys already set for that method keep
    /// their first value.
    pub fn method_defaults<I, K, V>(&mut self, method: &str, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entry = self
            .method_params
            .entry(method.to_ascii_uppercase())
            .or_default();
        for (key, value) in params {
            entry.entry(key.into()).or_insert_with(|| value.into());
        }
        self
    }

    /// Overrides for `GET` requests.
    pub fn get<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_defaults(Method::GET.as_str(), params)
    }

    /// Overrides for `POST` requests.
    pub fn post<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_defaults(Method::POST.as_str(), params)
    }

    /// Overrides for `PUT` requests.
    pub fn put<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_defaults(Method::PUT.as_str(), params)
    }

    /// Overrides for `DELETE` requests.
    pub fn delete<I, K, V>(&mut self, params: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.method_defaults(Method::DELETE.as_str(), params)
    }

    /// Set the condition predicate. Returning `false` rejects the match and
    /// the router continues with the next route.
    pub fn condition<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&ParamMap, &Method, &str) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(predicate));
        self
    }

    /// Set the after-match callback.
    pub fn callback<F>(&mut self, transform: F) -> &mut Self
    where
        F: Fn(ParamMap, &Method, &str) -> ParamMap + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(transform));
        self
    }

    pub(crate) fn accepts(&self, params: &ParamMap, method: &Method, path: &str) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| condition(params, method, path))
    }

    pub(crate) fn after_match(&self, params: ParamMap, method: &Method, path: &str) -> ParamMap {
        match &self.callback {
            Some(callback) => callback(params, method, path),
            None => params,
        }
    }

    /// Structural test only: no parameters are extracted and no hooks run.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        let path = path.trim_matches('/');
        match &self.matcher {
            Some(matcher) => matcher.is_match(path),
            None => self.template == path,
        }
    }

    fn required_count(&self) -> usize {
        self.named_params.len() - self.optional_params.len()
    }

    /// Match `path` structurally and merge the parameter sources.
    ///
    /// Returns `Ok(None)` when the path does not fit the template. On a
    /// match the result is, in order of increasing precedence:
    ///
    /// - `GET`: defaults, method overrides, captured values
    /// - any other method: defaults, captured values, method overrides
    ///
    /// so that e.g. a `PUT` override of `action` beats whatever the URL
    /// carried. Optional parameters that were not in the path fall back to
    /// their default and are left out entirely when they have none. Every
    /// value is URL-decoded once.
    ///
    /// # Errors
    ///
    /// [`RouterError::CaptureMismatch`] when a required parameter group did
    /// not take part in the match, which only a malformed inline pattern can
    /// cause.
    pub fn extract(&self, method: &Method, path: &str) -> Result<Option<ParamMap>, RouterError> {
        let path = path.trim_matches('/');
        let overrides = self.method_params(method.as_str());

        let Some(matcher) = &self.matcher else {
            if self.template != path {
                return Ok(None);
            }
            let mut slots = IndexMap::new();
            overlay(&mut slots, Some(&self.default_params));
            overlay(&mut slots, overrides);
            return Ok(Some(finish(slots)));
        };

        let Some(caps) = matcher.captures(path) else {
            return Ok(None);
        };

        let mut captured = ParamMap::with_capacity(self.named_params.len());
        let mut missing_required = false;
        for (index, name) in self.named_params.keys().enumerate() {
            match caps.name(&group_name(index)) {
                Some(m) => {
                    captured.insert(name.clone(), m.as_str().to_string());
                }
                None if self.optional_params.contains_key(name) => {}
                None => missing_required = true,
            }
        }

        if missing_required {
            let optional_matched = captured
                .keys()
                .filter(|name| self.optional_params.contains_key(*name))
                .count();
            return Err(RouterError::CaptureMismatch {
                route: self.name.clone(),
                matched: captured.len(),
                named: self.required_count() + optional_matched,
            });
        }

        let mut slots: IndexMap<&str, Option<&str>> = self
            .named_params
            .keys()
            .map(|name| (name.as_str(), None))
            .collect();
        overlay(&mut slots, Some(&self.default_params));
        if method.as_str().eq_ignore_ascii_case(Method::GET.as_str()) {
            overlay(&mut slots, overrides);
            overlay(&mut slots, Some(&captured));
        } else {
            overlay(&mut slots, Some(&captured));
            overlay(&mut slots, overrides);
        }

        Ok(Some(finish(slots)))
    }
}

fn finish(slots: IndexMap<&str, Option<&str>>) -> ParamMap {
    slots
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name.to_string(), decode(value))))
        .collect()
}
