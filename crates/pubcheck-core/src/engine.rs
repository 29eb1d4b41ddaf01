//! Traversal and aggregation engine
//!
//! [`validate`] visits every node of a document exactly once, in document
//! order, dispatches the rules registered for each node's kind, and
//! accumulates findings into a [`Report`]. It never short-circuits:
//! full-document reporting is the point. Two runs over an unchanged
//! document produce identical reports, which CI relies on.

use crate::document::feed::{Feed, FeedMetadata, Publication};
use crate::document::link::Link;
use crate::document::manifest::{Manifest, Metadata, TocEntry};
use crate::document::path::NodePath;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::report::Report;
use crate::rules::RuleSet;
use std::collections::{BTreeMap, BTreeSet};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Discriminates which rules apply to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The synthetic whole-document node, visited first at `$`
    Document,
    /// `$.metadata` of a manifest
    ManifestMetadata,
    /// One `$.readingOrder[i]` entry
    ReadingOrderItem,
    /// One `$.toc[i]` entry (or nested child), depth-first
    TocEntry,
    /// One `$.resources[i]` entry
    Resource,
    /// One manifest-level `$.links[i]` entry
    ManifestLink,
    /// `$.metadata` of a feed
    FeedMetadata,
    /// One `$.navigation[i]` entry
    NavigationLink,
    /// One `$.publications[i]` entry
    Publication,
    /// One link or image of a publication
    PublicationLink,
    /// One feed-level `$.links[i]` entry
    FeedLink,
}

/// Borrowed view of one addressable sub-structure
#[derive(Debug, Clone, Copy)]
pub enum NodeData<'doc> {
    /// The whole document
    Document(&'doc Document),
    /// A manifest metadata block
    ManifestMetadata(&'doc Metadata),
    /// Any link object
    Link(&'doc Link),
    /// A table-of-contents entry
    TocEntry(&'doc TocEntry),
    /// A feed metadata block
    FeedMetadata(&'doc FeedMetadata),
    /// A publication entry
    Publication(&'doc Publication),
}

/// One addressable node, handed to rules during traversal
#[derive(Debug, Clone)]
pub struct Node<'doc> {
    /// Which rules apply to this node
    pub kind: NodeKind,
    /// Location of the node within the document
    pub path: NodePath,
    /// The node's typed content
    pub data: NodeData<'doc>,
}

impl<'doc> Node<'doc> {
    /// The link behind this node, if it is one
    pub fn as_link(&self) -> Option<&'doc Link> {
        match self.data {
            NodeData::Link(link) => Some(link),
            _ => None,
        }
    }

    /// The toc entry behind this node, if it is one
    pub fn as_toc_entry(&self) -> Option<&'doc TocEntry> {
        match self.data {
            NodeData::TocEntry(entry) => Some(entry),
            _ => None,
        }
    }

    /// The publication behind this node, if it is one
    pub fn as_publication(&self) -> Option<&'doc Publication> {
        match self.data {
            NodeData::Publication(publication) => Some(publication),
            _ => None,
        }
    }
}

/// Read-only whole-document indices for cross-referential rules
///
/// Built once per validation call, before any rule runs, so rules stay
/// pure and testable against synthetic single-node inputs. Ordered
/// collections keep iteration deterministic.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    /// Hrefs declared under `resources`
    pub resource_hrefs: BTreeSet<String>,
    /// Reading-order positions per href, in document order
    pub reading_order_positions: BTreeMap<String, Vec<usize>>,
    /// Sum of declared reading-order durations
    pub reading_order_duration_sum: f64,
    /// How many reading-order items declare a duration
    pub reading_order_durations_declared: usize,
    /// Number of reading-order items
    pub reading_order_len: usize,
    /// Toc paths per full href, in playback order
    pub toc_positions: BTreeMap<String, Vec<NodePath>>,
    /// Publication positions per identifier, in document order
    pub publication_positions: BTreeMap<String, Vec<usize>>,
}

impl DocumentIndex {
    /// Build the indices for `document`
    pub fn build(document: &Document) -> Self {
        match document {
            Document::Manifest(manifest) => Self::for_manifest(manifest),
            Document::Feed(feed) => Self::for_feed(feed),
        }
    }

    fn for_manifest(manifest: &Manifest) -> Self {
        let mut index = Self {
            reading_order_len: manifest.reading_order.len(),
            ..Self::default()
        };
        for resource in &manifest.resources {
            index.resource_hrefs.insert(resource.href.clone());
        }
        for (position, item) in manifest.reading_order.iter().enumerate() {
            index
                .reading_order_positions
                .entry(item.href.clone())
                .or_default()
                .push(position);
            if let Some(duration) = item.duration {
                index.reading_order_duration_sum += duration;
                index.reading_order_durations_declared += 1;
            }
        }
        for entry in manifest.toc_in_playback_order() {
            index
                .toc_positions
                .entry(entry.href.clone())
                .or_default()
                .push(entry.path.clone());
        }
        index
    }

    fn for_feed(feed: &Feed) -> Self {
        let mut index = Self::default();
        for (position, publication) in feed.publications.iter().enumerate() {
            if let Some(identifier) = &publication.metadata.identifier {
                index
                    .publication_positions
                    .entry(identifier.clone())
                    .or_default()
                    .push(position);
            }
        }
        index
    }
}

/// Read-only context handed to every rule invocation
#[derive(Debug)]
pub struct DocumentContext<'doc> {
    /// The full document, for cross-referential checks
    pub document: &'doc Document,
    /// Whole-document indices built before rule evaluation
    pub index: &'doc DocumentIndex,
}

/// Validate `document` against `rules` and aggregate all findings
///
/// Findings never abort the traversal. The only error outcomes are rule
/// defects: a panicking rule surfaces as
/// [`Error::RuleFailure`], kept loud and distinct from both structural
/// errors and findings.
pub fn validate(document: &Document, rules: &RuleSet) -> Result<Report> {
    let index = DocumentIndex::build(document);
    let ctx = DocumentContext { document, index: &index };
    let mut findings = Vec::new();

    for node in document_nodes(document) {
        for rule in rules.rules_for(node.kind) {
            let outcome = catch_unwind(AssertUnwindSafe(|| rule.apply(&node, &ctx)));
            match outcome {
                Ok(rule_findings) => findings.extend(rule_findings),
                Err(_) => {
                    return Err(Error::RuleFailure {
                        rule: rule.id().to_string(),
                        path: node.path.to_string(),
                    })
                }
            }
        }
    }

    tracing::debug!(
        kind = %document.kind(),
        findings = findings.len(),
        "validation run complete"
    );
    Ok(Report::new(findings))
}

/// Flatten the document into nodes, in deterministic document order
///
/// Manifest: document, metadata, reading order, toc (depth-first),
/// resources, links. Feed: document, metadata, navigation, publications
/// with their links and images, feed links.
fn document_nodes(document: &Document) -> Vec<Node<'_>> {
    let mut nodes = vec![Node {
        kind: NodeKind::Document,
        path: NodePath::root(),
        data: NodeData::Document(document),
    }];

    match document {
        Document::Manifest(manifest) => {
            nodes.push(Node {
                kind: NodeKind::ManifestMetadata,
                path: manifest.metadata.path.clone(),
                data: NodeData::ManifestMetadata(&manifest.metadata),
            });
            push_links(&mut nodes, &manifest.reading_order, NodeKind::ReadingOrderItem);
            for entry in manifest.toc_in_playback_order() {
                nodes.push(Node {
                    kind: NodeKind::TocEntry,
                    path: entry.path.clone(),
                    data: NodeData::TocEntry(entry),
                });
            }
            push_links(&mut nodes, &manifest.resources, NodeKind::Resource);
            push_links(&mut nodes, &manifest.links, NodeKind::ManifestLink);
        }
        Document::Feed(feed) => {
            nodes.push(Node {
                kind: NodeKind::FeedMetadata,
                path: feed.metadata.path.clone(),
                data: NodeData::FeedMetadata(&feed.metadata),
            });
            push_links(&mut nodes, &feed.navigation, NodeKind::NavigationLink);
            for publication in &feed.publications {
                nodes.push(Node {
                    kind: NodeKind::Publication,
                    path: publication.path.clone(),
                    data: NodeData::Publication(publication),
                });
                push_links(&mut nodes, &publication.links, NodeKind::PublicationLink);
                push_links(&mut nodes, &publication.images, NodeKind::PublicationLink);
            }
            push_links(&mut nodes, &feed.links, NodeKind::FeedLink);
        }
    }

    nodes
}

fn push_links<'doc>(nodes: &mut Vec<Node<'doc>>, links: &'doc [Link], kind: NodeKind) {
    for link in links {
        nodes.push(Node {
            kind,
            path: link.path.clone(),
            data: NodeData::Link(link),
        });
    }
}
