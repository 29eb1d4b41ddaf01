//! Typed model of an RWPM-style audiobook manifest
//!
//! Field set follows the Readium Web Publication Manifest audiobook
//! profile: `metadata`, `readingOrder`, optional `resources`, `links`, and
//! a `toc` hierarchy. Construction rejects structurally unusable input
//! (missing required fields, wrong primitive types) so rules can assume a
//! well-typed tree.

use crate::document::link::Link;
use crate::document::path::NodePath;
use crate::document::value;
use crate::error::Result;
use serde_json::{Map, Value};

/// An audiobook manifest document
#[derive(Debug, Clone)]
pub struct Manifest {
    /// The `@context` declaration; a bare string becomes a one-element list
    pub context: Vec<String>,
    /// Publication-level metadata
    pub metadata: Metadata,
    /// Ordered audio tracks
    pub reading_order: Vec<Link>,
    /// Declared ancillary resources (cover, matching track entries)
    pub resources: Vec<Link>,
    /// Manifest-level links (self, license)
    pub links: Vec<Link>,
    /// Table of contents hierarchy
    pub toc: Vec<TocEntry>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

/// Publication metadata block of a manifest
#[derive(Debug, Clone)]
pub struct Metadata {
    /// Location of this block (`$.metadata`)
    pub path: NodePath,
    /// The `@type` declaration
    pub type_uri: Option<String>,
    /// Publication identifier, conventionally a URI/URN
    pub identifier: Option<String>,
    /// Publication title; required
    pub title: String,
    /// Declared languages
    pub language: Vec<String>,
    /// Declared total duration in seconds
    pub duration: Option<f64>,
    /// Publication date, expected RFC 3339
    pub published: Option<String>,
    /// Last-modified date, expected RFC 3339
    pub modified: Option<String>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

const METADATA_KNOWN_FIELDS: &[&str] = &[
    "@type",
    "identifier",
    "title",
    "language",
    "duration",
    "published",
    "modified",
];

/// One entry of the table of contents
#[derive(Debug, Clone)]
pub struct TocEntry {
    /// Location of this entry within the document
    pub path: NodePath,
    /// Target, usually a reading-order href plus a `#t=` fragment
    pub href: String,
    /// Entry title
    pub title: Option<String>,
    /// Nested sub-entries, depth-first under this entry
    pub children: Vec<TocEntry>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Parse a manifest from a raw JSON document
    pub(crate) fn parse(raw: &Value) -> Result<Self> {
        let root = NodePath::root();
        let map = value::require_object(raw, &root)?;

        let metadata_map = value::require_object_field(map, "metadata", &root)?;
        let metadata = Metadata::parse(metadata_map, root.key("metadata"))?;

        // The reading order must exist even if empty; emptiness is a rule
        // concern, absence a structural one.
        let reading_order_raw = value::require_array_field(map, "readingOrder", &root)?;
        let reading_order_path = root.key("readingOrder");
        let reading_order = reading_order_raw
            .iter()
            .enumerate()
            .map(|(i, item)| Link::parse(item, reading_order_path.index(i)))
            .collect::<Result<Vec<_>>>()?;

        let toc_path = root.key("toc");
        let toc = value::optional_array(map, "toc", &root)?
            .iter()
            .enumerate()
            .map(|(i, entry)| TocEntry::parse(entry, toc_path.index(i)))
            .collect::<Result<Vec<_>>>()?;

        let manifest = Self {
            context: value::str_or_str_list(map, "@context", &root)?,
            metadata,
            reading_order,
            resources: Link::parse_list(map, "resources", &root)?,
            links: Link::parse_list(map, "links", &root)?,
            toc,
            extra: value::extra_fields(
                map,
                &["@context", "metadata", "readingOrder", "resources", "links", "toc"],
            ),
        };

        tracing::debug!(
            tracks = manifest.reading_order.len(),
            resources = manifest.resources.len(),
            toc_entries = manifest.toc.len(),
            "parsed audiobook manifest"
        );
        Ok(manifest)
    }

    /// All toc entries in playback order, depth-first
    pub fn toc_in_playback_order(&self) -> Vec<&TocEntry> {
        let mut entries = Vec::new();
        for entry in &self.toc {
            entry.collect(&mut entries);
        }
        entries
    }
}

impl Metadata {
    fn parse(map: &Map<String, Value>, path: NodePath) -> Result<Self> {
        Ok(Self {
            type_uri: value::optional_str(map, "@type", &path)?,
            identifier: value::optional_str(map, "identifier", &path)?,
            title: value::require_str(map, "title", &path)?,
            language: value::str_or_str_list(map, "language", &path)?,
            duration: value::optional_f64(map, "duration", &path)?,
            published: value::optional_str(map, "published", &path)?,
            modified: value::optional_str(map, "modified", &path)?,
            extra: value::extra_fields(map, METADATA_KNOWN_FIELDS),
            path,
        })
    }
}

impl TocEntry {
    fn parse(raw: &Value, path: NodePath) -> Result<Self> {
        let map = value::require_object(raw, &path)?;
        let children_path = path.key("children");
        let children = value::optional_array(map, "children", &path)?
            .iter()
            .enumerate()
            .map(|(i, child)| Self::parse(child, children_path.index(i)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            href: value::require_str(map, "href", &path)?,
            title: value::optional_str(map, "title", &path)?,
            children,
            extra: value::extra_fields(map, &["href", "title", "children"]),
            path,
        })
    }

    /// The href with any media-fragment suffix (`#t=...`) removed
    pub fn href_without_fragment(&self) -> &str {
        self.href.split('#').next().unwrap_or(&self.href)
    }

    fn collect<'a>(&'a self, into: &mut Vec<&'a TocEntry>) {
        into.push(self);
        for child in &self.children {
            child.collect(into);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_manifest() -> Value {
        json!({
            "@context": "https://readium.org/webpub-manifest/context.jsonld",
            "metadata": {
                "@type": "https://schema.org/Audiobook",
                "identifier": "urn:isbn:9780000000001",
                "title": "Example Audiobook",
                "duration": 312.0
            },
            "readingOrder": [
                {"href": "track1.mp3", "type": "audio/mpeg", "duration": 312.0}
            ],
            "resources": [
                {"href": "track1.mp3", "type": "audio/mpeg"}
            ]
        })
    }

    #[test]
    fn parses_minimal_manifest() {
        let manifest = Manifest::parse(&minimal_manifest()).unwrap();
        assert_eq!(manifest.metadata.title, "Example Audiobook");
        assert_eq!(manifest.reading_order.len(), 1);
        assert_eq!(manifest.resources.len(), 1);
        assert_eq!(manifest.reading_order[0].path.to_string(), "$.readingOrder[0]");
    }

    #[test]
    fn missing_reading_order_is_structural_at_root() {
        let mut raw = minimal_manifest();
        raw.as_object_mut().unwrap().remove("readingOrder");
        let err = Manifest::parse(&raw).unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("structural error at $:"));
        assert!(rendered.contains("readingOrder"));
    }

    #[test]
    fn missing_metadata_title_is_structural() {
        let mut raw = minimal_manifest();
        raw["metadata"].as_object_mut().unwrap().remove("title");
        let err = Manifest::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("$.metadata"));
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn toc_hierarchy_is_collected_depth_first() {
        let mut raw = minimal_manifest();
        raw.as_object_mut().unwrap().insert(
            "toc".to_string(),
            json!([
                {"href": "track1.mp3#t=0", "title": "Part 1", "children": [
                    {"href": "track1.mp3#t=100", "title": "Chapter 1"}
                ]},
                {"href": "track1.mp3#t=200", "title": "Part 2"}
            ]),
        );
        let manifest = Manifest::parse(&raw).unwrap();
        let order: Vec<_> = manifest
            .toc_in_playback_order()
            .iter()
            .map(|e| e.href.as_str())
            .collect();
        assert_eq!(
            order,
            vec!["track1.mp3#t=0", "track1.mp3#t=100", "track1.mp3#t=200"]
        );
        assert_eq!(
            manifest.toc[0].children[0].path.to_string(),
            "$.toc[0].children[0]"
        );
        assert_eq!(manifest.toc[0].href_without_fragment(), "track1.mp3");
    }

    #[test]
    fn wrong_duration_type_is_structural() {
        let mut raw = minimal_manifest();
        raw["readingOrder"][0]["duration"] = json!("312");
        let err = Manifest::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("$.readingOrder[0].duration"));
    }
}
