//! Node addressing within a parsed document
//!
//! Every node in a [`Document`](crate::Document) carries a [`NodePath`]
//! assigned at construction time. The path is the only addressing scheme
//! findings can use, so it is rendered in the familiar JSONPath style
//! (`$.readingOrder[1].href`) that renderers can print verbatim.

use serde::{Serialize, Serializer};
use std::fmt;

/// One step from a JSON object or array into a child value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member access by key
    Key(String),
    /// Array element access by index
    Index(usize),
}

/// Sequence of keys/indices locating a node within the document tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<PathSegment>,
}

impl NodePath {
    /// The document root, rendered as `$`
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend this path with an object key
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.into()));
        Self { segments }
    }

    /// Extend this path with an array index
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Whether this path starts with every segment of `prefix`
    ///
    /// Matching is segment-wise, so `$.readingOrder[1]` is a prefix of
    /// `$.readingOrder[1].href` but not of `$.readingOrder[10]`.
    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.segments.len() >= prefix.segments.len()
            && self.segments[..prefix.segments.len()] == prefix.segments[..]
    }

    /// The trailing array index, if the last segment is one
    ///
    /// Used by duplicate-detection rules to tell the first occurrence of a
    /// value apart from repeats.
    pub fn last_index(&self) -> Option<usize> {
        match self.segments.last() {
            Some(PathSegment::Index(i)) => Some(*i),
            _ => None,
        }
    }

    /// Number of segments below the root
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
