//! Nested resource path generation.
//!
//! A resource nested under parents is addressed by walking the parents in order:
//! `{post: "abc"}` under `comments` becomes `/posts/abc/comments`.

use crate::inflect::pluralize;
use indexmap::IndexMap;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;

/// Ordered mapping of parent resource name → parent identifier.
///
/// Iteration order is insertion order, which is also the order the segments
/// appear in the generated path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegments(IndexMap<String, String>);

impl PathSegments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, parent: impl Into<String>, id: impl Display) -> Self {
        self.insert(parent, id);
        self
    }

    pub fn insert(&mut self, parent: impl Into<String>, id: impl Display) {
        self.0.insert(parent.into(), id.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for PathSegments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut segments = Self::new();
        for (parent, id) in iter {
            segments.insert(parent, id);
        }
        segments
    }
}

/// Accepts `{ "post": "abc", "user": 7 }`; ids may be strings, numbers or booleans.
impl<'de> Deserialize<'de> for PathSegments {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = IndexMap::<String, Value>::deserialize(deserializer)?;
        let mut segments = Self::new();
        for (parent, id) in raw {
            match id {
                Value::String(s) => segments.insert(parent, s),
                Value::Number(n) => segments.insert(parent, n),
                Value::Bool(b) => segments.insert(parent, b),
                other => {
                    return Err(de::Error::custom(format!(
                        "path segment `{parent}` must be a string or number, got {other}"
                    )))
                }
            }
        }
        Ok(segments)
    }
}

/// Builds `/{plural(parent)}/{id}/.../{resource_name}`.
///
/// The resource name is used verbatim; only parent names are pluralized.
///
/// ```
/// use resource_store::path::{generate_path, PathSegments};
///
/// let segments = PathSegments::new().with("post", "abc");
/// assert_eq!(generate_path(&segments, "comments"), "/posts/abc/comments");
/// assert_eq!(generate_path(&PathSegments::new(), "comments"), "/comments");
/// ```
pub fn generate_path(segments: &PathSegments, resource_name: &str) -> String {
    let mut path = segments
        .iter()
        .fold(String::new(), |mut path, (parent, id)| {
            path.push('/');
            path.push_str(&pluralize(parent));
            path.push('/');
            path.push_str(id);
            path
        });
    path.push('/');
    path.push_str(resource_name);
    path
}
