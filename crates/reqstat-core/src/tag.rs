//! Metric tags (`key:value` tokens) and ordered tag sets.
//!
//! Tag identity is the full token string: `env:prod` and `env:dev` are two
//! distinct tags, and merging never overrides one key with another value.

use std::fmt;

use serde::Deserialize;

use crate::error::{ReqstatError, Result};

/// Characters that would break the statsd line format.
const RESERVED: [char; 5] = ['|', ',', '#', '\n', '\r'];

/// A single validated tag token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct Tag(String);

impl Tag {
    /// Build `key:value`, rejecting reserved characters.
    pub fn new<V: fmt::Display>(key: &str, value: V) -> Result<Self> {
        Self::parse(format!("{key}:{value}"))
    }

    /// Validate a raw token. Value-less tokens (`canary`) are accepted.
    pub fn parse<S: Into<String>>(token: S) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(ReqstatError::InvalidTag("empty tag".into()));
        }
        if token.contains(RESERVED) {
            return Err(ReqstatError::InvalidTag(format!(
                "{token:?} contains a reserved character"
            )));
        }
        Ok(Self(token))
    }

    /// Build `key:value` from request-derived input, replacing reserved
    /// characters with `_` instead of failing.
    pub fn sanitized<V: fmt::Display>(key: &str, value: V) -> Self {
        let raw = format!("{key}:{value}");
        let clean: String = raw
            .chars()
            .map(|c| if RESERVED.contains(&c) { '_' } else { c })
            .collect();
        Self(clean)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the first `:` (the whole token for value-less tags).
    pub fn key(&self) -> &str {
        self.0.split_once(':').map_or(self.0.as_str(), |(k, _)| k)
    }

    pub fn value(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, v)| v)
    }
}

impl TryFrom<String> for Tag {
    type Error = ReqstatError;

    fn try_from(s: String) -> Result<Self> {
        Tag::parse(s)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Duplicate-free tag collection.
///
/// Insertion order is kept so emitted lines are deterministic, but equality
/// is set equality.
#[derive(Debug, Clone, Default, Eq, Deserialize)]
#[serde(from = "Vec<Tag>")]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless an identical token is already present.
    /// Returns whether the tag was added.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    /// True if any tag renders exactly as `token`.
    pub fn contains_token(&self, token: &str) -> bool {
        self.tags.iter().any(|t| t.as_str() == token)
    }

    /// Set union on token strings: `self` first, then the new tokens of `other`.
    pub fn union(&self, other: &TagSet) -> TagSet {
        let mut out = self.clone();
        out.extend(other.iter().cloned());
        out
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }
}

impl PartialEq for TagSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Extend<Tag> for TagSet {
    fn extend<I: IntoIterator<Item = Tag>>(&mut self, iter: I) {
        for t in iter {
            self.insert(t);
        }
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut out = TagSet::new();
        out.extend(iter);
        out
    }
}

impl From<Vec<Tag>> for TagSet {
    fn from(v: Vec<Tag>) -> Self {
        v.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

impl IntoIterator for TagSet {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.into_iter()
    }
}
