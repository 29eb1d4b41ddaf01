//! Typed model of an OPDS 2.0 catalog feed
//!
//! Field set follows the OPDS 2.0 draft: feed `metadata`, feed-level
//! `links`, optional `navigation`, and a list of `publications` each with
//! their own metadata, links, and images.

use crate::document::link::Link;
use crate::document::path::NodePath;
use crate::document::value;
use crate::error::Result;
use serde_json::{Map, Value};

/// A catalog feed document
#[derive(Debug, Clone)]
pub struct Feed {
    /// Feed-level metadata
    pub metadata: FeedMetadata,
    /// Feed-level links (self, pagination, search)
    pub links: Vec<Link>,
    /// Navigation entries for browsing the catalog
    pub navigation: Vec<Link>,
    /// Publications listed by this feed page
    pub publications: Vec<Publication>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

/// Metadata block of a feed
#[derive(Debug, Clone)]
pub struct FeedMetadata {
    /// Location of this block (`$.metadata`)
    pub path: NodePath,
    /// Feed title; required
    pub title: String,
    /// Declared number of items across all pages
    pub number_of_items: Option<f64>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

/// One publication entry in a feed
#[derive(Debug, Clone)]
pub struct Publication {
    /// Location of this entry (`$.publications[i]`)
    pub path: NodePath,
    /// Publication metadata
    pub metadata: PublicationMetadata,
    /// Publication links; acquisition links live here
    pub links: Vec<Link>,
    /// Cover and thumbnail images
    pub images: Vec<Link>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

/// Metadata block of a publication entry
#[derive(Debug, Clone)]
pub struct PublicationMetadata {
    /// Location of this block (`$.publications[i].metadata`)
    pub path: NodePath,
    /// The `@type` declaration
    pub type_uri: Option<String>,
    /// Publication identifier, conventionally a URI/URN
    pub identifier: Option<String>,
    /// Publication title; required
    pub title: String,
    /// Declared language
    pub language: Vec<String>,
    /// Declared duration in seconds, for audiobooks
    pub duration: Option<f64>,
    /// Publication date, expected RFC 3339
    pub published: Option<String>,
    /// Last-modified date, expected RFC 3339
    pub modified: Option<String>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

/// Relation prefix shared by all OPDS acquisition variants
/// (the bare rel plus `/open-access`, `/borrow`, `/buy`, `/sample`)
pub const OPDS_ACQ_REL_PREFIX: &str = "http://opds-spec.org/acquisition";

impl Feed {
    /// Parse a feed from a raw JSON document
    pub(crate) fn parse(raw: &Value) -> Result<Self> {
        let root = NodePath::root();
        let map = value::require_object(raw, &root)?;

        let metadata_map = value::require_object_field(map, "metadata", &root)?;
        let metadata = FeedMetadata::parse(metadata_map, root.key("metadata"))?;

        let publications_path = root.key("publications");
        let publications = value::optional_array(map, "publications", &root)?
            .iter()
            .enumerate()
            .map(|(i, publication)| Publication::parse(publication, publications_path.index(i)))
            .collect::<Result<Vec<_>>>()?;

        let feed = Self {
            metadata,
            links: Link::parse_list(map, "links", &root)?,
            navigation: Link::parse_list(map, "navigation", &root)?,
            publications,
            extra: value::extra_fields(map, &["metadata", "links", "navigation", "publications"]),
        };

        tracing::debug!(
            publications = feed.publications.len(),
            navigation = feed.navigation.len(),
            links = feed.links.len(),
            "parsed catalog feed"
        );
        Ok(feed)
    }
}

impl FeedMetadata {
    fn parse(map: &Map<String, Value>, path: NodePath) -> Result<Self> {
        Ok(Self {
            title: value::require_str(map, "title", &path)?,
            number_of_items: value::optional_f64(map, "numberOfItems", &path)?,
            extra: value::extra_fields(map, &["title", "numberOfItems"]),
            path,
        })
    }
}

impl Publication {
    fn parse(raw: &Value, path: NodePath) -> Result<Self> {
        let map = value::require_object(raw, &path)?;
        let metadata_map = value::require_object_field(map, "metadata", &path)?;
        let metadata = PublicationMetadata::parse(metadata_map, path.key("metadata"))?;

        Ok(Self {
            metadata,
            links: Link::parse_list(map, "links", &path)?,
            images: Link::parse_list(map, "images", &path)?,
            extra: value::extra_fields(map, &["metadata", "links", "images"]),
            path,
        })
    }

    /// Links whose relation marks them as acquisition links
    pub fn acquisition_links(&self) -> impl Iterator<Item = &Link> {
        self.links
            .iter()
            .filter(|link| link.rel.iter().any(|rel| rel.starts_with(OPDS_ACQ_REL_PREFIX)))
    }
}

impl PublicationMetadata {
    fn parse(map: &Map<String, Value>, path: NodePath) -> Result<Self> {
        Ok(Self {
            type_uri: value::optional_str(map, "@type", &path)?,
            identifier: value::optional_str(map, "identifier", &path)?,
            title: value::require_str(map, "title", &path)?,
            language: value::str_or_str_list(map, "language", &path)?,
            duration: value::optional_f64(map, "duration", &path)?,
            published: value::optional_str(map, "published", &path)?,
            modified: value::optional_str(map, "modified", &path)?,
            extra: value::extra_fields(
                map,
                &["@type", "identifier", "title", "language", "duration", "published", "modified"],
            ),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_feed() -> Value {
        json!({
            "metadata": {"title": "Example Catalog"},
            "links": [
                {"href": "https://example.org/catalog.json", "rel": "self",
                 "type": "application/opds+json"}
            ],
            "publications": [
                {
                    "metadata": {
                        "@type": "https://schema.org/Audiobook",
                        "identifier": "urn:isbn:9780000000001",
                        "title": "Example Audiobook"
                    },
                    "links": [
                        {"href": "https://example.org/borrow/1",
                         "rel": "http://opds-spec.org/acquisition",
                         "type": "application/audiobook+json"}
                    ]
                }
            ]
        })
    }

    #[test]
    fn parses_minimal_feed() {
        let feed = Feed::parse(&minimal_feed()).unwrap();
        assert_eq!(feed.metadata.title, "Example Catalog");
        assert_eq!(feed.publications.len(), 1);
        assert_eq!(
            feed.publications[0].metadata.path.to_string(),
            "$.publications[0].metadata"
        );
        assert_eq!(feed.publications[0].acquisition_links().count(), 1);
    }

    #[test]
    fn missing_feed_metadata_is_structural() {
        let err = Feed::parse(&json!({"publications": []})).unwrap_err();
        assert!(err.to_string().contains("metadata"));
    }

    #[test]
    fn publication_without_title_is_structural() {
        let mut raw = minimal_feed();
        raw["publications"][0]["metadata"]
            .as_object_mut()
            .unwrap()
            .remove("title");
        let err = Feed::parse(&raw).unwrap_err();
        assert!(err.to_string().contains("$.publications[0].metadata"));
    }

    #[test]
    fn open_access_rel_counts_as_acquisition() {
        let mut raw = minimal_feed();
        raw["publications"][0]["links"][0]["rel"] =
            json!("http://opds-spec.org/acquisition/open-access");
        let feed = Feed::parse(&raw).unwrap();
        assert_eq!(feed.publications[0].acquisition_links().count(), 1);
    }
}
