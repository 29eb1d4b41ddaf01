//! Rules for the audiobook-manifest variant

use crate::engine::{DocumentContext, Node, NodeData, NodeKind};
use crate::report::Finding;
use crate::rules::Rule;
use url::Url;

/// Slack allowed between the declared total duration and the sum of
/// reading-order item durations; some encoders round per track.
pub const DURATION_TOLERANCE_SECONDS: f64 = 0.5;

/// Whether an href is an internal reference rather than an absolute URI
fn is_internal_href(href: &str) -> bool {
    matches!(Url::parse(href), Err(url::ParseError::RelativeUrlWithoutBase))
}

/// The reading order must contain at least one item
pub struct ReadingOrderNotEmpty;

impl Rule for ReadingOrderNotEmpty {
    fn id(&self) -> &'static str {
        "reading-order-not-empty"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Document]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(manifest) = ctx.document.as_manifest() else { return Vec::new() };
        if manifest.reading_order.is_empty() {
            vec![Finding::error(
                self.id(),
                node.path.key("readingOrder"),
                "reading order must contain at least one item",
            )]
        } else {
            Vec::new()
        }
    }
}

/// Every reading-order item must declare an audio media type
pub struct AudioMediaType;

impl Rule for AudioMediaType {
    fn id(&self) -> &'static str {
        "audio-media-type"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::ReadingOrderItem]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(item) = node.as_link() else { return Vec::new() };
        match item.media_type.as_deref() {
            None => vec![Finding::error(
                self.id(),
                node.path.clone(),
                "reading-order item does not declare a media type",
            )],
            Some(media_type) if !media_type.starts_with("audio/") => vec![Finding::error(
                self.id(),
                node.path.key("type"),
                format!("`{}` is not an audio media type", media_type),
            )],
            Some(_) => Vec::new(),
        }
    }
}

/// Resources and manifest links should declare a media type
pub struct MediaTypeDeclared;

impl Rule for MediaTypeDeclared {
    fn id(&self) -> &'static str {
        "media-type-declared"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Resource, NodeKind::ManifestLink]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(link) = node.as_link() else { return Vec::new() };
        if link.media_type.is_none() {
            vec![Finding::warning(
                self.id(),
                node.path.clone(),
                format!("link `{}` does not declare a media type", link.href),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Internal reading-order hrefs must match a declared resource entry
pub struct InternalHrefResolves;

impl Rule for InternalHrefResolves {
    fn id(&self) -> &'static str {
        "internal-href-resolves"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::ReadingOrderItem]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(item) = node.as_link() else { return Vec::new() };
        if item.templated || !is_internal_href(&item.href) {
            return Vec::new();
        }
        if ctx.index.resource_hrefs.contains(&item.href) {
            return Vec::new();
        }
        vec![Finding::error(
            self.id(),
            node.path.clone(),
            format!("no resource entry matches href `{}`", item.href),
        )]
    }
}

/// Reading-order items must not repeat the same resource
pub struct DuplicateReadingOrderHref;

impl Rule for DuplicateReadingOrderHref {
    fn id(&self) -> &'static str {
        "duplicate-reading-order-href"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::ReadingOrderItem]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(item) = node.as_link() else { return Vec::new() };
        let Some(positions) = ctx.index.reading_order_positions.get(&item.href) else {
            return Vec::new();
        };
        // Only repeat occurrences are flagged, so each duplicated href
        // yields one finding per extra occurrence.
        if positions.len() > 1 && node.path.last_index() != positions.first().copied() {
            vec![Finding::warning(
                self.id(),
                node.path.clone(),
                format!(
                    "href `{}` already appears in the reading order at position {}",
                    item.href, positions[0]
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Every toc href must point into the reading order
pub struct TocHrefInReadingOrder;

impl Rule for TocHrefInReadingOrder {
    fn id(&self) -> &'static str {
        "toc-href-in-reading-order"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::TocEntry]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(entry) = node.as_toc_entry() else { return Vec::new() };
        let target = entry.href_without_fragment();
        if !is_internal_href(target) {
            return Vec::new();
        }
        if ctx.index.reading_order_positions.contains_key(target) {
            return Vec::new();
        }
        vec![Finding::error(
            self.id(),
            node.path.clone(),
            format!("toc href `{}` is not found in the reading order", target),
        )]
    }
}

/// Toc hrefs should be unique
pub struct DuplicateTocHref;

impl Rule for DuplicateTocHref {
    fn id(&self) -> &'static str {
        "duplicate-toc-href"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::TocEntry]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(entry) = node.as_toc_entry() else { return Vec::new() };
        let Some(positions) = ctx.index.toc_positions.get(&entry.href) else {
            return Vec::new();
        };
        if positions.len() > 1 && positions.first() != Some(&node.path) {
            vec![Finding::warning(
                self.id(),
                node.path.clone(),
                format!("duplicate toc href `{}`", entry.href),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Toc entries should carry a title
pub struct TocEntryTitle;

impl Rule for TocEntryTitle {
    fn id(&self) -> &'static str {
        "toc-entry-title"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::TocEntry]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(entry) = node.as_toc_entry() else { return Vec::new() };
        match entry.title.as_deref() {
            None | Some("") => vec![Finding::warning(
                self.id(),
                node.path.clone(),
                "toc entry has no title",
            )],
            Some(_) => Vec::new(),
        }
    }
}

/// Declared total duration should match the sum of item durations
pub struct TotalDurationConsistency;

impl Rule for TotalDurationConsistency {
    fn id(&self) -> &'static str {
        "total-duration-consistency"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::ManifestMetadata]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let NodeData::ManifestMetadata(metadata) = node.data else { return Vec::new() };
        let Some(total) = metadata.duration else { return Vec::new() };
        // Not applicable unless every item declares a duration; a partial
        // sum would always mismatch.
        if ctx.index.reading_order_len == 0
            || ctx.index.reading_order_durations_declared != ctx.index.reading_order_len
        {
            return Vec::new();
        }
        let sum = ctx.index.reading_order_duration_sum;
        if (total - sum).abs() > DURATION_TOLERANCE_SECONDS {
            vec![Finding::warning(
                self.id(),
                node.path.key("duration"),
                format!(
                    "declared duration {} differs from reading-order sum {}",
                    total, sum
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

/// The publication identifier should be a resolvable URI/URN
pub struct IdentifierWellFormed;

impl Rule for IdentifierWellFormed {
    fn id(&self) -> &'static str {
        "identifier-well-formed"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::ManifestMetadata]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let NodeData::ManifestMetadata(metadata) = node.data else { return Vec::new() };
        match metadata.identifier.as_deref() {
            None => vec![Finding::warning(
                self.id(),
                node.path.clone(),
                "metadata does not declare an identifier",
            )],
            Some(identifier) if Url::parse(identifier).is_err() => vec![Finding::warning(
                self.id(),
                node.path.key("identifier"),
                format!("identifier `{}` is not a URI", identifier),
            )],
            Some(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_href_detection() {
        assert!(is_internal_href("track1.mp3"));
        assert!(is_internal_href("audio/track1.mp3"));
        assert!(!is_internal_href("https://cdn.example.org/track1.mp3"));
        assert!(!is_internal_href("urn:isbn:9780000000001"));
    }
}
