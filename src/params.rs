//! Parameter maps and the URL codec applied to parameter values.
//!
//! Parameters are kept in an [`IndexMap`] so the order in which they were
//! merged (template order first, then defaults, then method overrides) is
//! preserved all the way to the caller.

use indexmap::IndexMap;
use std::borrow::Cow;

/// Ordered mapping from parameter name to value.
pub type ParamMap = IndexMap<String, String>;

/// Build a [`ParamMap`] from anything yielding string-ish pairs.
///
/// ```
/// let params = waymark::params::param_map([("module", "users"), ("item", "42")]);
/// assert_eq!(params["item"], "42");
/// ```
pub fn param_map<I, K, V>(pairs: I) -> ParamMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Decode a matched parameter value.
///
/// `+` is read as a space and `%XX` escapes are expanded. Invalid UTF-8
/// after decoding is replaced rather than rejected.
#[must_use]
pub fn decode(value: &str) -> String {
    let plus_decoded = value.replace('+', " ");
    let bytes = urlencoding::decode_binary(plus_decoded.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Encode a parameter value for substitution into a generated URL.
///
/// Everything outside `A-Za-z0-9-_.~` is percent-escaped, so `decode(encode(x)) == x`.
#[must_use]
pub fn encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
