//! Rules shared by both document variants
//!
//! Numeric sanity and declared-type syntax apply the same way to manifest
//! links, feed links, and publication metadata.

use crate::engine::{DocumentContext, Node, NodeData, NodeKind};
use crate::report::Finding;
use crate::rules::Rule;
use regex::Regex;
use std::sync::OnceLock;

/// `type/subtype` with optional parameters, per RFC 6838 naming
fn media_type_regex() -> &'static Regex {
    static MEDIA_TYPE: OnceLock<Regex> = OnceLock::new();
    MEDIA_TYPE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*(;.*)?$")
            .unwrap()
    })
}

/// Whether a declared media type is syntactically a `type/subtype` pair
pub(crate) fn is_well_formed_media_type(media_type: &str) -> bool {
    media_type_regex().is_match(media_type)
}

/// A declared `type` must be a syntactically valid media type
pub struct MediaTypeWellFormed;

impl Rule for MediaTypeWellFormed {
    fn id(&self) -> &'static str {
        "media-type-well-formed"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[
            NodeKind::ReadingOrderItem,
            NodeKind::Resource,
            NodeKind::ManifestLink,
            NodeKind::FeedLink,
            NodeKind::NavigationLink,
            NodeKind::PublicationLink,
        ]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(link) = node.as_link() else { return Vec::new() };
        match &link.media_type {
            Some(media_type) if !is_well_formed_media_type(media_type) => vec![Finding::error(
                self.id(),
                node.path.key("type"),
                format!("`{}` is not a valid media type", media_type),
            )],
            _ => Vec::new(),
        }
    }
}

/// Declared durations must be non-negative
pub struct NonNegativeDuration;

impl Rule for NonNegativeDuration {
    fn id(&self) -> &'static str {
        "non-negative-duration"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[
            NodeKind::ManifestMetadata,
            NodeKind::ReadingOrderItem,
            NodeKind::Resource,
            NodeKind::Publication,
        ]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let (duration, path) = match node.data {
            NodeData::ManifestMetadata(metadata) => (metadata.duration, &metadata.path),
            NodeData::Link(link) => (link.duration, &link.path),
            NodeData::Publication(publication) => {
                (publication.metadata.duration, &publication.metadata.path)
            }
            _ => return Vec::new(),
        };
        match duration {
            Some(value) if value < 0.0 => vec![Finding::error(
                self.id(),
                path.key("duration"),
                format!("duration {} must not be negative", value),
            )],
            _ => Vec::new(),
        }
    }
}

/// Declared byte lengths must be non-negative
pub struct NonNegativeLength;

impl Rule for NonNegativeLength {
    fn id(&self) -> &'static str {
        "non-negative-length"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[
            NodeKind::ReadingOrderItem,
            NodeKind::Resource,
            NodeKind::ManifestLink,
            NodeKind::FeedLink,
            NodeKind::PublicationLink,
        ]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(link) = node.as_link() else { return Vec::new() };
        match link.bit_length {
            Some(length) if length < 0.0 => vec![Finding::error(
                self.id(),
                node.path.key("length"),
                format!("length {} must not be negative", length),
            )],
            _ => Vec::new(),
        }
    }
}

/// `published`/`modified` dates should parse as RFC 3339
pub struct DateTimeWellFormed;

impl DateTimeWellFormed {
    fn check(path: &crate::document::NodePath, field: &str, value: &Option<String>) -> Option<Finding> {
        let value = value.as_deref()?;
        if chrono::DateTime::parse_from_rfc3339(value).is_ok() {
            return None;
        }
        Some(Finding::warning(
            "datetime-well-formed",
            path.key(field),
            format!("`{}` is not an RFC 3339 date-time", value),
        ))
    }
}

impl Rule for DateTimeWellFormed {
    fn id(&self) -> &'static str {
        "datetime-well-formed"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::ManifestMetadata, NodeKind::Publication]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let (path, published, modified) = match node.data {
            NodeData::ManifestMetadata(metadata) => {
                (&metadata.path, &metadata.published, &metadata.modified)
            }
            NodeData::Publication(publication) => (
                &publication.metadata.path,
                &publication.metadata.published,
                &publication.metadata.modified,
            ),
            _ => return Vec::new(),
        };
        [("published", published), ("modified", modified)]
            .into_iter()
            .filter_map(|(field, value)| Self::check(path, field, value))
            .collect()
    }
}
