//! Template compiler.
//!
//! Turns a path template such as `/<:module>/<#item>(.<:format>)` into an
//! anchored [`Regex`] plus the metadata needed to read parameters back out
//! of it and to substitute values into it again.
//!
//! ## Token syntax
//!
//! | Token              | Matches                          |
//! |--------------------|----------------------------------|
//! | `<:name>`          | `[a-zA-Z0-9_\-+%\s]+`            |
//! | `<#name>`          | `[0-9]+`                         |
//! | `<*name>`          | `.*`                             |
//! | `<:name\|pattern>` | `pattern`, verbatim              |
//! | `(pre<:name>suf)`  | the whole group is optional      |
//!
//! Each parameter is compiled into a named group (`p0`, `p1`, ... in
//! template order) so inline patterns that carry their own groups cannot
//! shift the captures of the parameters that follow them.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RouterError;

/// Character class for `<:name>` tokens.
pub const GENERIC_CLASS: &str = r"[a-zA-Z0-9_\-+%\s]+";
/// Character class for `<#name>` tokens.
pub const NUMERIC_CLASS: &str = "[0-9]+";
/// Character class for `<*name>` tokens.
pub const WILDCARD_CLASS: &str = ".*";

#[allow(clippy::expect_used)]
static PARAM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<([:#*])([^>]+)>").expect("valid parameter token regex"));

#[allow(clippy::expect_used)]
static OPTIONAL_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(([^<()]*)<([:#*])([^>]+)>([^()]*)\)").expect("valid optional group regex")
});

/// How a parameter segment is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// `<:name>`
    Generic,
    /// `<#name>`
    Numeric,
    /// `<*name>`
    Wildcard,
    /// `<?name|pattern>` with the pattern used as-is
    Inline(String),
}

impl ParamKind {
    fn from_marker(marker: &str) -> Self {
        match marker {
            "#" => ParamKind::Numeric,
            "*" => ParamKind::Wildcard,
            _ => ParamKind::Generic,
        }
    }

    /// Regex source used for this parameter.
    #[must_use]
    pub fn class(&self) -> &str {
        match self {
            ParamKind::Generic => GENERIC_CLASS,
            ParamKind::Numeric => NUMERIC_CLASS,
            ParamKind::Wildcard => WILDCARD_CLASS,
            ParamKind::Inline(pattern) => pattern,
        }
    }
}

/// A `(prefix<token>suffix)` group recorded during compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionalSegment {
    /// The full group text as written in the template, parentheses included
    pub segment: String,
    /// Literal text before the token inside the group
    pub prefix: String,
    /// Literal text after the token inside the group
    pub suffix: String,
}

/// Output of [`compile`].
#[derive(Debug, Clone)]
pub(crate) struct CompiledTemplate {
    pub template: String,
    pub matcher: Option<Regex>,
    pub named_params: IndexMap<String, String>,
    pub kinds: Vec<ParamKind>,
    pub optional_params: IndexMap<String, OptionalSegment>,
}

impl CompiledTemplate {
    fn literal(template: String) -> Self {
        Self {
            template,
            matcher: None,
            named_params: IndexMap::new(),
            kinds: Vec::new(),
            optional_params: IndexMap::new(),
        }
    }
}

/// Name of the regex group holding the parameter at `index`.
pub(crate) fn group_name(index: usize) -> String {
    format!("p{index}")
}

struct Token {
    name: String,
    kind: ParamKind,
    text: String,
}

impl Token {
    fn parse(marker: &str, body: &str, template: &str) -> Result<Self, RouterError> {
        let (name, kind) = match body.split_once('|') {
            Some((name, pattern)) => (name, ParamKind::Inline(pattern.to_string())),
            None => (body, ParamKind::from_marker(marker)),
        };
        if name.is_empty() {
            return Err(RouterError::invalid_template(
                template,
                format!("parameter token '<{marker}{body}>' has no name"),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            kind,
            text: format!("<{marker}{body}>"),
        })
    }
}

/// Accumulates the regex source and parameter metadata while scanning.
struct Builder<'t> {
    template: &'t str,
    pattern: String,
    named_params: IndexMap<String, String>,
    kinds: Vec<ParamKind>,
    optional_params: IndexMap<String, OptionalSegment>,
}

impl<'t> Builder<'t> {
    fn new(template: &'t str, capacity: usize) -> Self {
        let mut pattern = String::with_capacity(capacity);
        pattern.push('^');
        Self {
            template,
            pattern,
            named_params: IndexMap::new(),
            kinds: Vec::new(),
            optional_params: IndexMap::new(),
        }
    }

    fn register(&mut self, token: &Token) -> Result<usize, RouterError> {
        if self.named_params.contains_key(&token.name) {
            return Err(RouterError::invalid_template(
                self.template,
                format!("parameter '{}' appears more than once", token.name),
            ));
        }
        let index = self.named_params.len();
        self.named_params
            .insert(token.name.clone(), token.text.clone());
        self.kinds.push(token.kind.clone());
        Ok(index)
    }

    fn push_group(&mut self, index: usize, kind: &ParamKind) {
        self.pattern.push_str("(?P<");
        self.pattern.push_str(&group_name(index));
        self.pattern.push('>');
        self.pattern.push_str(kind.class());
        self.pattern.push(')');
    }

    /// Literal text interleaved with required tokens.
    fn push_required(&mut self, text: &str) -> Result<(), RouterError> {
        let mut last = 0;
        for caps in PARAM_TOKEN.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            self.pattern.push_str(&regex::escape(&text[last..whole.start()]));
            let token = Token::parse(capture(&caps, 1), capture(&caps, 2), self.template)?;
            let index = self.register(&token)?;
            self.push_group(index, &token.kind);
            last = whole.end();
        }
        self.pattern.push_str(&regex::escape(&text[last..]));
        Ok(())
    }

    fn push_optional(&mut self, caps: &regex::Captures<'_>) -> Result<(), RouterError> {
        let prefix = capture(caps, 1);
        let suffix = capture(caps, 4);
        let token = Token::parse(capture(caps, 2), capture(caps, 3), self.template)?;
        let index = self.register(&token)?;

        self.pattern.push_str("(?:");
        self.pattern.push_str(&regex::escape(prefix));
        self.push_group(index, &token.kind);
        self.pattern.push_str(&regex::escape(suffix));
        self.pattern.push_str(")?");

        self.optional_params.insert(
            token.name,
            OptionalSegment {
                segment: capture(caps, 0).to_string(),
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            },
        );
        Ok(())
    }
}

fn capture<'h>(caps: &regex::Captures<'h>, index: usize) -> &'h str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// Reject optional groups the matcher cannot represent: more than one
/// token in a group, or a token inside nested parentheses.
fn check_optional_groups(text: &str, template: &str) -> Result<(), RouterError> {
    let mut depth = 0usize;
    let mut nested = false;
    let mut tokens = 0usize;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                // Token bodies may hold inline patterns with their own parens.
                let closed = chars.by_ref().any(|n| n == '>');
                if closed && depth > 0 {
                    tokens += 1;
                }
            }
            '(' => {
                depth += 1;
                nested |= depth > 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if tokens > 1 {
                        return Err(RouterError::invalid_template(
                            template,
                            "an optional group may contain exactly one parameter",
                        ));
                    }
                    if nested && tokens > 0 {
                        return Err(RouterError::invalid_template(
                            template,
                            "nested optional groups are not supported",
                        ));
                    }
                    nested = false;
                    tokens = 0;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Compile `template` into a matcher.
///
/// Templates without any `<` are static. Templates that contain `<` but no
/// recognisable token also degrade to static, so a typo yields a route that
/// only matches its literal text rather than an error.
pub(crate) fn compile(template: &str) -> Result<CompiledTemplate, RouterError> {
    let trimmed = template.trim_matches('/');
    if !trimmed.contains('<') {
        return Ok(CompiledTemplate::literal(trimmed.to_string()));
    }

    check_optional_groups(trimmed, template)?;

    let mut builder = Builder::new(template, trimmed.len() * 2 + 2);
    let mut cursor = 0;
    for caps in OPTIONAL_GROUP.captures_iter(trimmed) {
        let Some(whole) = caps.get(0) else { continue };
        builder.push_required(&trimmed[cursor..whole.start()])?;
        builder.push_optional(&caps)?;
        cursor = whole.end();
    }
    builder.push_required(&trimmed[cursor..])?;

    if builder.named_params.is_empty() {
        return Ok(CompiledTemplate::literal(trimmed.to_string()));
    }

    builder.pattern.push('$');
    let matcher = Regex::new(&builder.pattern)
        .map_err(|e| RouterError::invalid_template(template, e.to_string()))?;

    Ok(CompiledTemplate {
        template: trimmed.to_string(),
        matcher: Some(matcher),
        named_params: builder.named_params,
        kinds: builder.kinds,
        optional_params: builder.optional_params,
    })
}
