//! The Link Object shared by manifests and feeds
//!
//! RWPM reading-order items, manifest resources, OPDS feed links,
//! navigation entries, and publication acquisition links are all the same
//! wire shape: an `href` plus optional typing and relation metadata.

use crate::document::path::NodePath;
use crate::document::value;
use crate::error::Result;
use serde_json::{Map, Value};

/// A single link object, typed at construction
#[derive(Debug, Clone)]
pub struct Link {
    /// Location of this link within the document
    pub path: NodePath,
    /// Target of the link; the one required field
    pub href: String,
    /// Declared media type (`type` on the wire)
    pub media_type: Option<String>,
    /// Human-readable title
    pub title: Option<String>,
    /// Link relations; a bare string on the wire becomes a one-element list
    pub rel: Vec<String>,
    /// Declared duration in seconds, for audio resources
    pub duration: Option<f64>,
    /// Declared size in bytes
    pub bit_length: Option<f64>,
    /// Whether `href` is a URI template
    pub templated: bool,
    /// Link properties object, preserved as-is
    pub properties: Map<String, Value>,
    /// Unknown fields, preserved but not validated
    pub extra: Map<String, Value>,
}

const KNOWN_FIELDS: &[&str] = &[
    "href",
    "type",
    "title",
    "rel",
    "duration",
    "length",
    "templated",
    "properties",
];

impl Link {
    /// Parse one link object at `path`
    ///
    /// `href` is required; a link without a target is structurally unusable
    /// and rejected before any rule runs.
    pub(crate) fn parse(raw: &Value, path: NodePath) -> Result<Self> {
        let map = value::require_object(raw, &path)?;
        let properties = match map.get("properties") {
            None | Some(Value::Null) => Map::new(),
            Some(props) => value::require_object(props, &path.key("properties"))?.clone(),
        };

        Ok(Self {
            href: value::require_str(map, "href", &path)?,
            media_type: value::optional_str(map, "type", &path)?,
            title: value::optional_str(map, "title", &path)?,
            rel: value::str_or_str_list(map, "rel", &path)?,
            duration: value::optional_f64(map, "duration", &path)?,
            bit_length: value::optional_f64(map, "length", &path)?,
            templated: value::optional_bool(map, "templated", &path)?.unwrap_or(false),
            extra: value::extra_fields(map, KNOWN_FIELDS),
            properties,
            path,
        })
    }

    /// Parse an array field of link objects, absent or null meaning empty
    pub(crate) fn parse_list(
        map: &Map<String, Value>,
        field: &str,
        parent: &NodePath,
    ) -> Result<Vec<Self>> {
        let items = value::optional_array(map, field, parent)?;
        let field_path = parent.key(field);
        items
            .iter()
            .enumerate()
            .map(|(i, item)| Self::parse(item, field_path.index(i)))
            .collect()
    }

    /// Whether any relation on this link equals `rel`
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rel.iter().any(|r| r == rel)
    }
}
