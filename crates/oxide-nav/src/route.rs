//! Route template compilation and matching.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use bigdecimal::BigDecimal;
use tracing::debug;

use crate::error::{Result, RouterError};
use crate::segment::{Segment, SegmentKind, SegmentValue};

/// Characters that separate the components of a template or a path.
const DELIMITERS: [char; 3] = ['/', '?', '&'];

/// Regex fragment emitted for wildcards and named segments.
const ANY: &str = ".*";

/// One component of a compiled template.
#[derive(Debug, Clone)]
enum Part {
    /// Matched verbatim (case-insensitively).
    Literal(String),
    /// `*`, matches anything.
    Wildcard,
    /// A named segment, matches anything and is validated by type.
    Named(String),
}

/// A compiled route template.
///
/// Template syntax:
/// - `users` - Literal component
/// - `*` - Wildcard, matches anything
/// - `:id` - Named string segment
/// - `:id:int`, `:price:num`, `:on:bool` - Named typed segments
///
/// `/`, `?` and `&` all separate components, so `search?:term&:page:int`
/// has the same structure as `search/:term/:page:int`.
///
/// # Example
///
/// ```
/// use oxide_nav::{CompiledRoute, SegmentValue};
///
/// let route = CompiledRoute::compile("users/:id:int/edit").unwrap();
/// assert!(route.matches("users/42/edit"));
/// assert!(!route.matches("users/abc/edit"));
/// assert_eq!(route.get_int("users/42/edit", "id"), Some(42));
/// assert_eq!(route.value("users/42/edit", "id"), Some(SegmentValue::Int(42)));
/// ```
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    /// The original template string.
    template: String,
    /// Parsed components, each paired with the delimiter preceding it.
    parts: Vec<(Option<char>, Part)>,
    /// Anchored, case-insensitive matcher.
    matcher: Regex,
    /// Named segments keyed by name.
    segments: HashMap<String, Segment>,
}

impl CompiledRoute {
    /// Compiles a template.
    ///
    /// Fails when a `:name[:type]` token is malformed or a segment name is
    /// declared twice.
    pub fn compile(template: &str) -> Result<Self> {
        let mut parts = Vec::new();
        let mut segments = HashMap::new();
        let mut fragments = Vec::new();

        for (position, (delimiter, component)) in split_delimited(template).into_iter().enumerate()
        {
            if component == "*" {
                fragments.push(ANY.to_string());
                parts.push((delimiter, Part::Wildcard));
            } else if let Some(token) = component.strip_prefix(':') {
                let segment = parse_segment(template, component, token, position)?;
                if segments.contains_key(&segment.name) {
                    return Err(RouterError::DuplicateSegment {
                        template: template.to_string(),
                        name: segment.name,
                    });
                }
                fragments.push(ANY.to_string());
                parts.push((delimiter, Part::Named(segment.name.clone())));
                segments.insert(segment.name.clone(), segment);
            } else {
                fragments.push(regex::escape(component));
                parts.push((delimiter, Part::Literal(component.to_string())));
            }
        }

        let pattern = format!("^{}/?$", fragments.join("/"));
        let matcher = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RouterError::Pattern {
                template: template.to_string(),
                source,
            })?;

        debug!(template, pattern = %pattern, segments = segments.len(), "compiled route");

        Ok(Self {
            template: template.to_string(),
            parts,
            matcher,
            segments,
        })
    }

    /// Returns the original template string.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the compiled matcher.
    #[must_use]
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Returns the named segments, in no particular order.
    #[must_use]
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    /// Returns a named segment.
    #[must_use]
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.get(name)
    }

    /// Returns whether the template declares any named segment.
    #[must_use]
    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    /// Checks a path against this route.
    ///
    /// The path must match the template's shape and every named segment
    /// must convert to its declared type. `?` and `&` in the path count as
    /// `/`, and a trailing `/` is ignored.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let candidate = format!("{}/", split_components(path).join("/"));
        if !self.matcher.is_match(&candidate) {
            return false;
        }
        !self.has_segments() || self.validate_segments(path)
    }

    /// Checks that every named segment of this route extracts from `path`
    /// with its declared type.
    #[must_use]
    pub fn validate_segments(&self, path: &str) -> bool {
        self.segments
            .keys()
            .all(|name| self.value(path, name).is_some())
    }

    /// Returns the raw component of `path` at the position of segment `name`.
    ///
    /// Works for segments of any kind.
    #[must_use]
    pub fn get_string(&self, path: &str, name: &str) -> Option<String> {
        let segment = self.segments.get(name)?;
        let components = split_components(path);
        if segment.position < components.len() {
            Some(components[segment.position].to_string())
        } else {
            None
        }
    }

    /// Returns segment `name` as an integer. `None` unless it was declared
    /// `:int` and the component parses.
    #[must_use]
    pub fn get_int(&self, path: &str, name: &str) -> Option<i64> {
        match self.typed(path, name, SegmentKind::Int)? {
            SegmentValue::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Returns segment `name` as a decimal. `None` unless it was declared
    /// `:num` and the component parses.
    #[must_use]
    pub fn get_decimal(&self, path: &str, name: &str) -> Option<BigDecimal> {
        match self.typed(path, name, SegmentKind::Decimal)? {
            SegmentValue::Decimal(v) => Some(v),
            _ => None,
        }
    }

    /// Returns segment `name` as a boolean. `None` unless it was declared
    /// `:bool`. Everything except `false` (any case) and `0` is `true`.
    #[must_use]
    pub fn get_bool(&self, path: &str, name: &str) -> Option<bool> {
        match self.typed(path, name, SegmentKind::Bool)? {
            SegmentValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Extracts segment `name` converted to its declared kind.
    #[must_use]
    pub fn value(&self, path: &str, name: &str) -> Option<SegmentValue> {
        let segment = self.segments.get(name)?;
        segment.kind.parse(&self.get_string(path, name)?)
    }

    /// Extracts every named segment from a matching path.
    ///
    /// Returns `None` when the path does not match this route.
    #[must_use]
    pub fn values(&self, path: &str) -> Option<HashMap<String, SegmentValue>> {
        if !self.matches(path) {
            return None;
        }
        self.segments
            .keys()
            .map(|name| Some((name.clone(), self.value(path, name)?)))
            .collect()
    }

    /// Builds a concrete path from segment values.
    ///
    /// Returns `None` if a segment has no value or the template contains a
    /// wildcard.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use oxide_nav::CompiledRoute;
    ///
    /// let route = CompiledRoute::compile("search?:term&:page:int").unwrap();
    /// let params: HashMap<String, String> = [
    ///     ("term".to_string(), "rust".to_string()),
    ///     ("page".to_string(), "2".to_string()),
    /// ]
    /// .into_iter()
    /// .collect();
    /// assert_eq!(route.reverse(&params), Some("search?rust&2".to_string()));
    /// ```
    #[must_use]
    pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
        let mut path = String::new();

        for (delimiter, part) in &self.parts {
            if let Some(d) = delimiter {
                path.push(*d);
            }
            match part {
                Part::Literal(s) => path.push_str(s),
                Part::Wildcard => return None,
                Part::Named(name) => path.push_str(params.get(name)?),
            }
        }

        Some(path)
    }

    fn typed(&self, path: &str, name: &str, kind: SegmentKind) -> Option<SegmentValue> {
        if self.segments.get(name)?.kind != kind {
            return None;
        }
        self.value(path, name)
    }
}

impl FromStr for CompiledRoute {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

impl fmt::Display for CompiledRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

/// Splits a template or path on `/`, `?` and `&`.
///
/// Trailing empty components are dropped, but at least one component is
/// always returned.
#[must_use]
pub fn split_components(s: &str) -> Vec<&str> {
    split_delimited(s).into_iter().map(|(_, c)| c).collect()
}

/// Like [`split_components`], keeping the delimiter preceding each component.
fn split_delimited(s: &str) -> Vec<(Option<char>, &str)> {
    let mut out = Vec::new();
    let mut delimiter = None;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        if DELIMITERS.contains(&c) {
            out.push((delimiter, &s[start..i]));
            delimiter = Some(c);
            start = i + c.len_utf8();
        }
    }
    out.push((delimiter, &s[start..]));

    while out.len() > 1 && out.last().is_some_and(|(_, c)| c.is_empty()) {
        out.pop();
    }
    out
}

/// Parses the body of a `:name[:type]` token (without the leading colon).
fn parse_segment(template: &str, component: &str, token: &str, position: usize) -> Result<Segment> {
    let invalid = |reason| RouterError::InvalidTemplate {
        template: template.to_string(),
        token: component.to_string(),
        reason,
    };

    let mut pieces = token.split(':');
    let name = pieces.next().unwrap_or_default();
    let suffix = pieces.next();

    if name.is_empty() {
        return Err(invalid("has an empty segment name"));
    }
    if suffix.is_some_and(str::is_empty) {
        return Err(invalid("has an empty type suffix"));
    }
    if pieces.next().is_some() {
        return Err(invalid("has more than one type suffix"));
    }

    Ok(Segment {
        position,
        name: name.to_string(),
        kind: SegmentKind::from_suffix(suffix),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_components() {
        assert_eq!(split_components("a/b?c&d"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_components("items/x/"), vec!["items", "x"]);
        assert_eq!(split_components("/users"), vec!["", "users"]);
        assert_eq!(split_components(""), vec![""]);
    }

    #[test]
    fn test_literal_route() {
        let route = CompiledRoute::compile("users").unwrap();
        assert!(route.matches("users"));
        assert!(route.matches("users/"));
        assert!(route.matches("USERS"));
        assert!(!route.matches("posts"));
        assert!(!route.matches("users/edit"));
    }

    #[test]
    fn test_literal_is_escaped() {
        let route = CompiledRoute::compile("a.b").unwrap();
        assert!(route.matches("a.b"));
        assert!(!route.matches("axb"));
    }

    #[test]
    fn test_segment_table() {
        let route = CompiledRoute::compile("search?q=x&:page:int").unwrap();
        let segment = route.segment("page").unwrap();
        assert_eq!(segment.position, 2);
        assert_eq!(segment.kind, SegmentKind::Int);
        assert_eq!(route.segments().count(), 1);
    }

    #[test]
    fn test_wrong_accessor_is_absent() {
        let route = CompiledRoute::compile("users/:id:int").unwrap();
        assert_eq!(route.get_bool("users/1", "id"), None);
        assert_eq!(route.get_decimal("users/1", "id"), None);
        assert_eq!(route.get_string("users/1", "id"), Some("1".to_string()));
        assert_eq!(route.get_int("users/1", "missing"), None);
    }

    #[test]
    fn test_invalid_tokens() {
        for template in ["users/:", "users/::int", "users/:id:", "users/:id:int:x"] {
            let err = CompiledRoute::compile(template).unwrap_err();
            assert!(
                matches!(err, RouterError::InvalidTemplate { .. }),
                "{template}: {err:?}"
            );
        }
    }

    #[test]
    fn test_duplicate_segment() {
        let err = CompiledRoute::compile("a/:id/b/:id:int").unwrap_err();
        assert!(matches!(err, RouterError::DuplicateSegment { ref name, .. } if name == "id"));
    }

    #[test]
    fn test_values() {
        let route = CompiledRoute::compile("shop/:item/:qty:int/:gift:bool").unwrap();
        let values = route.values("shop/pen/3/0").unwrap();
        assert_eq!(values["item"], SegmentValue::Str("pen".into()));
        assert_eq!(values["qty"], SegmentValue::Int(3));
        assert_eq!(values["gift"], SegmentValue::Bool(false));
        assert!(route.values("shop/pen/three/0").is_none());
    }

    #[test]
    fn test_reverse() {
        let route = CompiledRoute::compile("users/:id:int/edit").unwrap();
        let params: HashMap<String, String> =
            [("id".to_string(), "42".to_string())].into_iter().collect();
        assert_eq!(route.reverse(&params), Some("users/42/edit".to_string()));
        assert!(route.reverse(&HashMap::new()).is_none());
    }

    #[test]
    fn test_from_str() {
        let route: CompiledRoute = "a/:b".parse().unwrap();
        assert_eq!(route.to_string(), "a/:b");
    }
}
