//! Query keys and their stable hashes.

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifies a query inside the engine's cache.
///
/// A key is an ordered list of JSON values, e.g. `["todos", {"page": 2}]`.
/// Two keys address the same cache entry when their [`hash`](Self::hash)es are
/// equal. Object members are hashed in sorted order, so `{"a":1,"b":2}` and
/// `{"b":2,"a":1}` are the same key.
///
/// # Example
///
/// ```rust
/// use oxide_query::QueryKey;
/// use serde_json::json;
///
/// let a = QueryKey::new(["todos", "list"]).with(json!({ "page": 2, "done": false }));
/// let b = QueryKey::from(vec![json!("todos"), json!("list"), json!({ "done": false, "page": 2 })]);
///
/// assert_eq!(a.hash(), b.hash());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(Vec<Value>);

impl QueryKey {
    /// Build a key from string segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(|segment| Value::String(segment.into()))
                .collect(),
        )
    }

    /// Append an arbitrary JSON part.
    pub fn with(mut self, part: impl Into<Value>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[Value] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable string form used as the cache hash.
    pub fn hash(&self) -> String {
        // Without `preserve_order`, serde_json stores objects in a BTreeMap,
        // which makes the serialized form independent of insertion order.
        Value::Array(self.0.clone()).to_string()
    }

    /// Whether `self` starts with every part of `prefix`.
    ///
    /// Used by engines for partial matching during invalidation.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        prefix.0.len() <= self.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }
}

impl From<Vec<Value>> for QueryKey {
    fn from(parts: Vec<Value>) -> Self {
        Self(parts)
    }
}

impl From<&str> for QueryKey {
    fn from(segment: &str) -> Self {
        Self::new([segment])
    }
}

impl<const N: usize> From<[&str; N]> for QueryKey {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash())
    }
}
