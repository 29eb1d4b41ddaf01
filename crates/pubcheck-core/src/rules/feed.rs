//! Rules for the catalog-feed variant

use crate::engine::{DocumentContext, Node, NodeKind};
use crate::report::Finding;
use crate::rules::Rule;
use url::Url;

/// Relations that must appear at most once among feed links
const PAGINATION_RELS: &[&str] = &["self", "next", "previous", "first", "last"];

/// A feed must list publications or offer navigation
pub struct FeedHasContent;

impl Rule for FeedHasContent {
    fn id(&self) -> &'static str {
        "feed-has-content"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Document]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(feed) = ctx.document.as_feed() else { return Vec::new() };
        if feed.publications.is_empty() && feed.navigation.is_empty() {
            vec![Finding::error(
                self.id(),
                node.path.clone(),
                "feed has neither publications nor navigation",
            )]
        } else {
            Vec::new()
        }
    }
}

/// A feed page should declare its own address
pub struct FeedSelfLink;

impl Rule for FeedSelfLink {
    fn id(&self) -> &'static str {
        "feed-self-link"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Document]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(feed) = ctx.document.as_feed() else { return Vec::new() };
        if feed.links.iter().any(|link| link.has_rel("self")) {
            Vec::new()
        } else {
            vec![Finding::warning(
                self.id(),
                node.path.key("links"),
                "feed has no link with rel `self`",
            )]
        }
    }
}

/// Pagination relations must be unambiguous
pub struct PaginationRelUnique;

impl Rule for PaginationRelUnique {
    fn id(&self) -> &'static str {
        "pagination-rel-unique"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Document]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(feed) = ctx.document.as_feed() else { return Vec::new() };
        PAGINATION_RELS
            .iter()
            .filter(|rel| feed.links.iter().filter(|link| link.has_rel(rel)).count() > 1)
            .map(|rel| {
                Finding::error(
                    self.id(),
                    node.path.key("links"),
                    format!("feed declares more than one link with rel `{}`", rel),
                )
            })
            .collect()
    }
}

/// Every publication needs a well-formed identifier
pub struct PublicationIdentifier;

impl Rule for PublicationIdentifier {
    fn id(&self) -> &'static str {
        "publication-identifier"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Publication]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(publication) = node.as_publication() else { return Vec::new() };
        match publication.metadata.identifier.as_deref() {
            // Without an identifier a catalog consumer cannot deduplicate
            // or track the publication at all.
            None => vec![Finding::error(
                self.id(),
                publication.metadata.path.clone(),
                "publication does not declare an identifier",
            )],
            Some(identifier) if Url::parse(identifier).is_err() => vec![Finding::warning(
                self.id(),
                publication.metadata.path.key("identifier"),
                format!("identifier `{}` is not a URI", identifier),
            )],
            Some(_) => Vec::new(),
        }
    }
}

/// Publication identifiers must be unique document-wide
pub struct DuplicatePublicationIdentifier;

impl Rule for DuplicatePublicationIdentifier {
    fn id(&self) -> &'static str {
        "duplicate-publication-identifier"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Publication]
    }

    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(publication) = node.as_publication() else { return Vec::new() };
        let Some(identifier) = publication.metadata.identifier.as_deref() else {
            return Vec::new();
        };
        let Some(positions) = ctx.index.publication_positions.get(identifier) else {
            return Vec::new();
        };
        if positions.len() > 1 && node.path.last_index() != positions.first().copied() {
            vec![Finding::error(
                self.id(),
                node.path.clone(),
                format!(
                    "identifier `{}` already used by the publication at position {}",
                    identifier, positions[0]
                ),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Every publication must be acquirable
pub struct PublicationAcquisitionLink;

impl Rule for PublicationAcquisitionLink {
    fn id(&self) -> &'static str {
        "publication-acquisition-link"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::Publication]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(publication) = node.as_publication() else { return Vec::new() };
        if publication.acquisition_links().next().is_some() {
            Vec::new()
        } else {
            vec![Finding::error(
                self.id(),
                node.path.key("links"),
                "publication has no acquisition link",
            )]
        }
    }
}

/// Navigation entries must carry a title
pub struct NavigationLinkTitle;

impl Rule for NavigationLinkTitle {
    fn id(&self) -> &'static str {
        "navigation-link-title"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::NavigationLink]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(link) = node.as_link() else { return Vec::new() };
        match link.title.as_deref() {
            None | Some("") => vec![Finding::error(
                self.id(),
                node.path.clone(),
                format!("navigation link `{}` has no title", link.href),
            )],
            Some(_) => Vec::new(),
        }
    }
}

/// Feed link hrefs must be usable URI references
pub struct LinkHrefValid;

impl Rule for LinkHrefValid {
    fn id(&self) -> &'static str {
        "link-href-valid"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::FeedLink, NodeKind::NavigationLink, NodeKind::PublicationLink]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(link) = node.as_link() else { return Vec::new() };
        let href = link.href.as_str();
        let problem = if href.is_empty() {
            Some("href is empty".to_string())
        } else if href.chars().any(char::is_whitespace) && !link.templated {
            Some(format!("href `{}` contains whitespace", href))
        } else {
            match Url::parse(href) {
                Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => None,
                Err(parse_error) => Some(format!("href `{}` is not a URI: {}", href, parse_error)),
            }
        };
        problem
            .map(|message| vec![Finding::error(self.id(), node.path.key("href"), message)])
            .unwrap_or_default()
    }
}

/// Feed and publication links should declare their content type
pub struct LinkTypeDeclared;

impl Rule for LinkTypeDeclared {
    fn id(&self) -> &'static str {
        "link-type-declared"
    }

    fn triggers(&self) -> &'static [NodeKind] {
        &[NodeKind::FeedLink, NodeKind::PublicationLink]
    }

    fn apply(&self, node: &Node<'_>, _ctx: &DocumentContext<'_>) -> Vec<Finding> {
        let Some(link) = node.as_link() else { return Vec::new() };
        if link.media_type.is_none() {
            vec![Finding::warning(
                self.id(),
                node.path.clone(),
                format!("link `{}` does not declare a content type", link.href),
            )]
        } else {
            Vec::new()
        }
    }
}
