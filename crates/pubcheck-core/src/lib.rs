//! Pubcheck Core - validation engine for digital-publication documents
//!
//! This crate inspects parsed audiobook manifests (Readium Web Publication
//! Manifest style JSON) and catalog feeds (OPDS 2.0 style JSON) and
//! produces a structured list of findings with precise paths back into the
//! source document.
//!
//! # Main Components
//!
//! - **Document Model**: typed, immutable tree built from raw JSON,
//!   rejecting structurally unusable input at construction time
//! - **Rule Set**: independent, stateless checks dispatched by node kind
//! - **Engine**: deterministic traversal aggregating all findings, never
//!   stopping at the first
//! - **Report**: frozen outcome of one run, with a derived pass/fail flag
//!
//! # Example
//!
//! ```
//! use pubcheck_core::{Document, RuleSet, validate};
//!
//! # fn main() -> pubcheck_core::Result<()> {
//! let raw = serde_json::json!({
//!     "metadata": {"title": "Example", "identifier": "urn:isbn:9780000000001"},
//!     "readingOrder": [
//!         {"href": "track1.mp3", "type": "audio/mpeg", "duration": 60.0}
//!     ],
//!     "resources": [{"href": "track1.mp3", "type": "audio/mpeg"}]
//! });
//!
//! let document = Document::parse_manifest(&raw)?;
//! let report = validate(&document, &RuleSet::standard())?;
//! assert!(report.is_valid());
//! # Ok(())
//! # }
//! ```
//!
//! Validation of a single document is a synchronous, purely computational
//! pass. Documents are immutable and the [`RuleSet`] is read-only after
//! construction, so many documents may be validated in parallel against
//! one shared rule set without locking.

pub mod document;
pub mod engine;
pub mod error;
pub mod report;
pub mod rules;

// Re-export main types for convenience
pub use document::{
    Document, DocumentKind, Feed, FeedMetadata, Link, Manifest, Metadata, NodePath, PathSegment,
    Publication, PublicationMetadata, TocEntry,
};
pub use engine::{validate, DocumentContext, DocumentIndex, Node, NodeData, NodeKind};
pub use error::{Error, Result};
pub use report::{Finding, Report, Severity};
pub use rules::{Rule, RuleSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
