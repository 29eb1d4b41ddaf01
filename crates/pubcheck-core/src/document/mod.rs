//! Typed, immutable document model
//!
//! A [`Document`] is built once from externally parsed JSON and is
//! read-only for the engine's lifetime. Construction rejects structurally
//! unusable input with [`Error::Structural`](crate::Error::Structural) so
//! that rules never see absent required data; everything softer is a rule
//! concern.

pub mod feed;
pub mod link;
pub mod manifest;
pub mod path;
pub(crate) mod value;

pub use feed::{Feed, FeedMetadata, Publication, PublicationMetadata, OPDS_ACQ_REL_PREFIX};
pub use link::Link;
pub use manifest::{Manifest, Metadata, TocEntry};
pub use path::{NodePath, PathSegment};

use crate::error::Result;
use serde_json::Value;

/// Root entity: an audiobook manifest or a catalog feed
#[derive(Debug, Clone)]
pub enum Document {
    /// RWPM-style audiobook manifest
    Manifest(Manifest),
    /// OPDS 2.0 catalog feed
    Feed(Feed),
}

/// Discriminant of a [`Document`], for logging and dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Audiobook manifest
    Manifest,
    /// Catalog feed
    Feed,
}

impl Document {
    /// Build an audiobook manifest document from raw JSON
    pub fn parse_manifest(raw: &Value) -> Result<Self> {
        Ok(Self::Manifest(Manifest::parse(raw)?))
    }

    /// Build a catalog feed document from raw JSON
    pub fn parse_feed(raw: &Value) -> Result<Self> {
        Ok(Self::Feed(Feed::parse(raw)?))
    }

    /// Which variant this document is
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Manifest(_) => DocumentKind::Manifest,
            Self::Feed(_) => DocumentKind::Feed,
        }
    }

    /// The manifest variant, if this is one
    pub fn as_manifest(&self) -> Option<&Manifest> {
        match self {
            Self::Manifest(manifest) => Some(manifest),
            Self::Feed(_) => None,
        }
    }

    /// The feed variant, if this is one
    pub fn as_feed(&self) -> Option<&Feed> {
        match self {
            Self::Feed(feed) => Some(feed),
            Self::Manifest(_) => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manifest => write!(f, "manifest"),
            Self::Feed => write!(f, "feed"),
        }
    }
}
