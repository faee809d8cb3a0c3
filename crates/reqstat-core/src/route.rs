//! Route templates and resolution.
//!
//! Metric names are derived from the route a request matched, never from
//! the raw path, so per-request values (ids, query strings) cannot blow up
//! metric cardinality.
//!
//! Template syntax, one `/` separated segment at a time:
//! - `users`            literal
//! - `:id` or `{id}`    captures exactly one segment
//! - `*rest` or `{*rest}` captures the remainder (last segment only)

use std::fmt;

use crate::error::{ReqstatError, Result};
use crate::name;

/// Canonical identifier of a registered route (`users.show`, `users.id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteId(String);

impl RouteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve a request to the identifier of the matching route.
///
/// Implementations return `ReqstatError::RouteNotFound` when nothing
/// matches; any other error is a genuine failure of the resolver.
pub trait RouteResolver: Send + Sync {
    /// Match a concrete request path (`/users/42`).
    fn resolve(&self, path: &str, method: &str) -> Result<RouteId>;

    /// Look up the route registered under `template` (`/users/:id`), as
    /// reported by the server framework's own router.
    fn resolve_template(&self, template: &str, method: &str) -> Result<RouteId>;
}

/// Drop everything from the first `?` onward.
pub fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    CatchAll(String),
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    template: String,
    segments: Vec<Segment>,
    id: RouteId,
}

impl Route {
    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    fn matches(&self, parts: &[&str]) -> bool {
        let mut i = 0;
        for seg in &self.segments {
            match seg {
                Segment::CatchAll(_) => return parts.get(i).map_or(false, |p| !p.is_empty()),
                Segment::Literal(l) => {
                    if parts.get(i) != Some(&l.as_str()) {
                        return false;
                    }
                }
                Segment::Param(_) => {
                    if parts.get(i).map_or(true, |p| p.is_empty()) {
                        return false;
                    }
                }
            }
            i += 1;
        }
        i == parts.len()
    }
}

/// Read-only route table. Build it at startup, share it across requests.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`RouteTable::insert`].
    pub fn route(mut self, method: &str, template: &str, id: Option<&str>) -> Result<Self> {
        self.insert(method, template, id)?;
        Ok(self)
    }

    /// Register a template. Without an explicit `id` the identifier is
    /// derived from the template (`/users/:id` -> `users.id`, `/` -> `index`).
    pub fn insert(&mut self, method: &str, template: &str, id: Option<&str>) -> Result<()> {
        let segments = compile_template(template)?;
        let id = match id {
            Some(n) => n.to_string(),
            None => derive_id(&segments),
        };
        name::validate(&id)?;

        self.routes.push(Route {
            method: method.to_ascii_uppercase(),
            template: template.to_string(),
            segments,
            id: RouteId(id),
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn with_get_fallback<'a>(
        &'a self,
        method: &str,
        find: impl Fn(&str) -> Option<&'a Route>,
    ) -> Option<&'a Route> {
        find(method).or_else(|| if method == "HEAD" { find("GET") } else { None })
    }

    fn best_match(&self, parts: &[&str], method: &str) -> Option<&Route> {
        let mut best: Option<&Route> = None;
        for r in self.routes.iter().filter(|r| r.method == method) {
            if !r.matches(parts) {
                continue;
            }
            // earliest registration wins ties
            if best.map_or(true, |b| r.literal_count() > b.literal_count()) {
                best = Some(r);
            }
        }
        best
    }
}

impl RouteResolver for RouteTable {
    fn resolve(&self, path: &str, method: &str) -> Result<RouteId> {
        let path = strip_query(path);
        let parts = split_path(path);
        let method = method.to_ascii_uppercase();

        self.with_get_fallback(&method, |m| self.best_match(&parts, m))
            .map(|r| r.id.clone())
            .ok_or_else(|| ReqstatError::RouteNotFound {
                method,
                path: path.to_string(),
            })
    }

    fn resolve_template(&self, template: &str, method: &str) -> Result<RouteId> {
        let method = method.to_ascii_uppercase();

        self.with_get_fallback(&method, |m| {
            self.routes
                .iter()
                .find(|r| r.method == m && r.template == template)
        })
        .map(|r| r.id.clone())
        .ok_or_else(|| ReqstatError::RouteNotFound {
            method,
            path: template.to_string(),
        })
    }
}

/// Path segments after the leading `/`. Empty segments are kept, so
/// `/test/` and `/users//42` never match `/test` or `/users/:id`.
fn split_path(path: &str) -> Vec<&str> {
    match path.strip_prefix('/').unwrap_or(path) {
        "" => Vec::new(),
        rest => rest.split('/').collect(),
    }
}

fn compile_template(template: &str) -> Result<Vec<Segment>> {
    if !template.starts_with('/') {
        return Err(ReqstatError::BadConfig(format!(
            "route template must start with '/': {template}"
        )));
    }

    let raw: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
    let mut out = Vec::with_capacity(raw.len());
    for (i, s) in raw.iter().enumerate() {
        let seg = parse_segment(s)?;
        if matches!(seg, Segment::CatchAll(_)) && i + 1 != raw.len() {
            return Err(ReqstatError::BadConfig(format!(
                "catch-all must be the last segment: {template}"
            )));
        }
        out.push(seg);
    }
    Ok(out)
}

fn parse_segment(s: &str) -> Result<Segment> {
    let inner = s.strip_prefix('{').and_then(|r| r.strip_suffix('}'));
    let (capture, body) = match (inner, s.strip_prefix(':'), s.strip_prefix('*')) {
        (Some(b), _, _) => match b.strip_prefix('*') {
            Some(rest) => (Some(true), rest),
            None => (Some(false), b),
        },
        (None, Some(b), _) => (Some(false), b),
        (None, None, Some(b)) => (Some(true), b),
        (None, None, None) => (None, s),
    };

    match capture {
        None => Ok(Segment::Literal(s.to_string())),
        Some(_) if body.is_empty() => Err(ReqstatError::BadConfig(format!(
            "unnamed capture in route segment: {s}"
        ))),
        Some(true) => Ok(Segment::CatchAll(body.to_string())),
        Some(false) => Ok(Segment::Param(body.to_string())),
    }
}

fn derive_id(segments: &[Segment]) -> String {
    if segments.is_empty() {
        return "index".to_string();
    }
    segments
        .iter()
        .map(|s| match s {
            Segment::Literal(v) | Segment::Param(v) | Segment::CatchAll(v) => v.as_str(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn segment_syntax() {
        assert_eq!(parse_segment("users").unwrap(), Segment::Literal("users".into()));
        assert_eq!(parse_segment(":id").unwrap(), Segment::Param("id".into()));
        assert_eq!(parse_segment("{id}").unwrap(), Segment::Param("id".into()));
        assert_eq!(parse_segment("*rest").unwrap(), Segment::CatchAll("rest".into()));
        assert_eq!(parse_segment("{*rest}").unwrap(), Segment::CatchAll("rest".into()));
        assert!(parse_segment(":").is_err());
        assert!(parse_segment("{}").is_err());
    }

    #[test]
    fn catch_all_must_be_last() {
        assert!(compile_template("/files/*path/meta").is_err());
        assert!(compile_template("files").is_err());
    }

    #[test]
    fn derived_ids() {
        assert_eq!(derive_id(&compile_template("/").unwrap()), "index");
        assert_eq!(derive_id(&compile_template("/users/:id").unwrap()), "users.id");
        assert_eq!(derive_id(&compile_template("/static/*path").unwrap()), "static.path");
    }

    #[test]
    fn empty_segments_are_kept() {
        assert!(split_path("/").is_empty());
        assert_eq!(split_path("/test/"), vec!["test", ""]);
        assert_eq!(split_path("/users//42"), vec!["users", "", "42"]);
    }

    #[test]
    fn query_is_stripped() {
        assert_eq!(strip_query("/a?b=1?c"), "/a");
        assert_eq!(strip_query("/a"), "/a");
        assert_eq!(strip_query("?x"), "");
    }
}
