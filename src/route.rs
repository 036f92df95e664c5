//! Route description and normalization.
//!
//! This module provides the boundary between a host web framework and the document
//! builder. A host exposes its route table through the [`RouteTable`] trait as a list of
//! [`RouteRule`]s, and each rule is normalized into an [`EndpointRecord`] with
//! [`EndpointRecord::adapt`].
//!
//! Rules use bracket placeholders for path segments (`/users/<id>` or
//! `/users/<int:id>`). The endpoint literal written to the document uses OpenAPI curly
//! braces (`/users/{id}`).
//!
//! # Example
//!
//! ```
//! use swagger_gen::route::{EndpointRecord, RouteRule};
//!
//! let rule = RouteRule::new("/api/users/<int:id>", ["GET", "HEAD", "OPTIONS"], "users.get_user");
//! let endpoint = EndpointRecord::adapt(&rule).unwrap();
//!
//! assert_eq!(endpoint.literal, "/api/users/{id}");
//! assert_eq!(endpoint.tag, "users");
//! assert_eq!(endpoint.short_name, "get_user");
//! assert_eq!(endpoint.methods.len(), 1);
//! ```

use crate::error::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Path prefix that is skipped when deriving an endpoint's tag
pub const RESERVED_TAG_PREFIX: &str = "api";

/// Separator between a view's namespace and its name (e.g. `users.get_user`)
pub const VIEW_SEPARATOR: char = '.';

/// Source of route rules for document generation.
///
/// Implemented by whatever owns the host application's route table. The rules are
/// enumerated once per document build.
pub trait RouteTable {
    /// Name of the application, used as the document title when none is configured
    fn app_name(&self) -> &str;

    /// All route rules currently registered on the application
    fn rules(&self) -> Vec<RouteRule>;
}

/// One route rule as reported by the host framework.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    /// URL pattern with bracket placeholders (e.g. `/users/<id>`)
    #[serde(rename = "rule")]
    pub pattern: String,
    /// HTTP methods the framework accepts for this rule
    pub methods: Vec<String>,
    /// Identifier of the view serving this rule
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Names of the path placeholders; derived from the pattern when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
}

impl RouteRule {
    /// Create a rule, deriving the argument names from the pattern
    pub fn new<I, S>(pattern: &str, methods: I, endpoint: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let arguments = rewrite_pattern(pattern)
            .map(|(_, names)| names)
            .unwrap_or_default();
        Self {
            pattern: pattern.to_string(),
            methods: methods.into_iter().map(Into::into).collect(),
            endpoint: Some(endpoint.to_string()),
            arguments,
        }
    }
}

/// A simple in-memory route table.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    name: String,
    rules: Vec<RouteRule>,
}

impl RouteMap {
    /// Create an empty route table for the named application
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Register a route
    pub fn route<I, S>(mut self, pattern: &str, methods: I, endpoint: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules.push(RouteRule::new(pattern, methods, endpoint));
        self
    }

    /// Register an already-built rule
    pub fn push(&mut self, rule: RouteRule) {
        self.rules.push(rule);
    }
}

impl RouteTable for RouteMap {
    fn app_name(&self) -> &str {
        &self.name
    }

    fn rules(&self) -> Vec<RouteRule> {
        self.rules.clone()
    }
}

impl RouteTable for Vec<RouteRule> {
    fn app_name(&self) -> &str {
        "app"
    }

    fn rules(&self) -> Vec<RouteRule> {
        self.clone()
    }
}

/// HTTP methods a route rule may declare.
///
/// The variant order is the order operations are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Trace,
    /// Implicit on every rule, never documented
    Options,
    /// Implicit on every rule, never documented
    Head,
}

impl HttpMethod {
    /// Upper-case verb
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
        }
    }

    /// Whether operations for this method appear in the document
    pub fn is_documented(&self) -> bool {
        !matches!(self, HttpMethod::Options | HttpMethod::Head)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "TRACE" => Ok(HttpMethod::Trace),
            "OPTIONS" => Ok(HttpMethod::Options),
            "HEAD" => Ok(HttpMethod::Head),
            other => Err(format!("unsupported HTTP method '{}'", other)),
        }
    }
}

/// Normalized, framework-independent view of one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRecord {
    /// The pattern as the framework reported it
    pub rule: String,
    /// Path with curly-brace placeholders, used as the `paths` key
    pub literal: String,
    /// Documented methods, de-duplicated and in emission order
    pub methods: Vec<HttpMethod>,
    /// Full view identifier (e.g. `users.get_user`)
    pub view_identifier: String,
    /// View identifier without its namespace (e.g. `get_user`)
    pub short_name: String,
    /// Path placeholder names in order of appearance
    pub path_segments: Vec<String>,
    /// Display group for the endpoint
    pub tag: String,
}

impl EndpointRecord {
    /// Normalize a route rule.
    ///
    /// # Errors
    ///
    /// Fails when the rule has no view identifier, when no tag can be derived from its
    /// path, when a placeholder is unterminated, or when a method is not a known verb.
    pub fn adapt(rule: &RouteRule) -> Result<Self> {
        let view_identifier = match rule.endpoint.as_deref() {
            Some(view) if !view.trim().is_empty() => view.to_string(),
            _ => return Err(Error::derivation(&rule.pattern, "missing view identifier")),
        };

        let (literal, derived) = rewrite_pattern(&rule.pattern)?;
        let path_segments = if rule.arguments.is_empty() {
            derived
        } else {
            dedup(rule.arguments.iter().cloned())
        };

        let mut methods = Vec::with_capacity(rule.methods.len());
        for method in &rule.methods {
            let method: HttpMethod = method
                .parse()
                .map_err(|message: String| Error::derivation(&rule.pattern, message))?;
            if method.is_documented() && !methods.contains(&method) {
                methods.push(method);
            }
        }
        methods.sort();

        let record = Self {
            rule: rule.pattern.clone(),
            literal,
            methods,
            short_name: short_view_name(&view_identifier).to_string(),
            view_identifier,
            path_segments,
            tag: derive_tag(&rule.pattern)?,
        };
        debug!(
            "Adapted rule {} -> {} {:?}",
            record.rule, record.literal, record.methods
        );
        Ok(record)
    }
}

/// The part of a view identifier after its last namespace separator
pub fn short_view_name(view_identifier: &str) -> &str {
    view_identifier
        .rsplit(VIEW_SEPARATOR)
        .next()
        .unwrap_or(view_identifier)
}

/// Derive the display tag: the first path segment, or the second when the first is the
/// reserved `api` prefix. A placeholder segment is never a tag.
fn derive_tag(pattern: &str) -> Result<String> {
    let mut segments = pattern.split('/').filter(|s| !s.is_empty());
    let tag = match segments.next() {
        Some(RESERVED_TAG_PREFIX) => segments.next(),
        first => first,
    };
    match tag {
        Some(tag) if tag.contains('<') => Err(Error::derivation(
            pattern,
            format!("path placeholder '{}' cannot be used as a tag", tag),
        )),
        Some(tag) => Ok(tag.to_string()),
        None => Err(Error::derivation(pattern, "failed to derive a tag from the path")),
    }
}

/// Convert `<name>` and `<converter:name>` placeholders to `{name}`, returning the new
/// literal and the placeholder names.
fn rewrite_pattern(pattern: &str) -> Result<(String, Vec<String>)> {
    let mut literal = String::with_capacity(pattern.len());
    let mut names = Vec::new();
    let mut rest = pattern;

    while let Some(start) = rest.find('<') {
        literal.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after
            .find('>')
            .ok_or_else(|| Error::derivation(pattern, "unterminated path placeholder"))?;
        let name = after[..end].rsplit(':').next().unwrap_or_default().trim();
        if name.is_empty() {
            return Err(Error::derivation(pattern, "empty path placeholder"));
        }
        literal.push('{');
        literal.push_str(name);
        literal.push('}');
        names.push(name.to_string());
        rest = &after[end + 1..];
    }
    literal.push_str(rest);

    Ok((literal, dedup(names)))
}

fn dedup(names: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
