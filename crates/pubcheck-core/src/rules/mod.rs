//! The validation rule catalog
//!
//! Every structural/semantic check is an independent, stateless [`Rule`].
//! A rule declares the node kinds it applies to (its trigger set), so the
//! engine dispatches from a map built once at [`RuleSet`] construction
//! instead of probing every rule against every node.
//!
//! Severity policy: violations that make the document unusable by a
//! conforming reader are errors; stylistic or redundant-but-harmless
//! deviations are warnings. The classification is part of each rule's
//! identity and stable across runs.

mod common;
mod feed;
mod manifest;

pub use common::{DateTimeWellFormed, MediaTypeWellFormed, NonNegativeDuration, NonNegativeLength};
pub use feed::{
    DuplicatePublicationIdentifier, FeedHasContent, FeedSelfLink, LinkHrefValid,
    LinkTypeDeclared, NavigationLinkTitle, PaginationRelUnique, PublicationAcquisitionLink,
    PublicationIdentifier,
};
pub use manifest::{
    AudioMediaType, DuplicateReadingOrderHref, DuplicateTocHref, IdentifierWellFormed,
    InternalHrefResolves, MediaTypeDeclared, ReadingOrderNotEmpty, TocEntryTitle,
    TocHrefInReadingOrder, TotalDurationConsistency,
};

use crate::engine::{DocumentContext, Node, NodeKind};
use crate::report::Finding;
use std::collections::HashMap;

/// A named, pure validation check
///
/// Rules are constructed once and reused across many validation runs;
/// they must not hold document-specific mutable state. `apply` must not
/// panic for any well-typed node: a node missing an optional field the
/// rule depends on is not-applicable and yields no finding.
pub trait Rule: Send + Sync {
    /// Stable identifier, reported with every finding
    fn id(&self) -> &'static str;

    /// Node kinds this rule is dispatched for
    fn triggers(&self) -> &'static [NodeKind];

    /// Evaluate one node against the whole-document context
    fn apply(&self, node: &Node<'_>, ctx: &DocumentContext<'_>) -> Vec<Finding>;
}

/// The rule registry: rules plus a kind-to-rule dispatch map
///
/// Built once at startup and read-only afterwards, so concurrent
/// validation runs can share one instance without synchronization.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
    dispatch: HashMap<NodeKind, Vec<usize>>,
}

impl RuleSet {
    /// Build a rule set; registration order fixes report ordering per node
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        let mut dispatch: HashMap<NodeKind, Vec<usize>> = HashMap::new();
        for (index, rule) in rules.iter().enumerate() {
            for kind in rule.triggers() {
                dispatch.entry(*kind).or_default().push(index);
            }
        }
        Self { rules, dispatch }
    }

    /// The standard catalog covering both document variants
    pub fn standard() -> Self {
        Self::new(vec![
            // Manifest rules
            Box::new(ReadingOrderNotEmpty),
            Box::new(AudioMediaType),
            Box::new(MediaTypeDeclared),
            Box::new(InternalHrefResolves),
            Box::new(DuplicateReadingOrderHref),
            Box::new(TocHrefInReadingOrder),
            Box::new(DuplicateTocHref),
            Box::new(TocEntryTitle),
            Box::new(TotalDurationConsistency),
            Box::new(IdentifierWellFormed),
            // Feed rules
            Box::new(FeedHasContent),
            Box::new(FeedSelfLink),
            Box::new(PaginationRelUnique),
            Box::new(PublicationIdentifier),
            Box::new(DuplicatePublicationIdentifier),
            Box::new(PublicationAcquisitionLink),
            Box::new(NavigationLinkTitle),
            Box::new(LinkHrefValid),
            Box::new(LinkTypeDeclared),
            // Shared numeric/typing rules
            Box::new(MediaTypeWellFormed),
            Box::new(NonNegativeDuration),
            Box::new(NonNegativeLength),
            Box::new(DateTimeWellFormed),
        ])
    }

    /// Rules registered for `kind`, in registration order
    pub(crate) fn rules_for(&self, kind: NodeKind) -> impl Iterator<Item = &dyn Rule> {
        self.dispatch
            .get(&kind)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|&index| self.rules[index].as_ref())
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn standard_catalog_has_unique_rule_ids() {
        let rules = RuleSet::standard();
        let mut seen = HashSet::new();
        for rule in &rules.rules {
            assert!(seen.insert(rule.id()), "duplicate rule id {}", rule.id());
        }
    }

    #[test]
    fn dispatch_covers_reading_order_items() {
        let rules = RuleSet::standard();
        let ids: Vec<_> = rules
            .rules_for(NodeKind::ReadingOrderItem)
            .map(Rule::id)
            .collect();
        assert!(ids.contains(&"audio-media-type"));
        assert!(ids.contains(&"internal-href-resolves"));
        assert!(ids.contains(&"non-negative-duration"));
    }

    #[test]
    fn unknown_kind_dispatches_nothing() {
        let rules = RuleSet::new(Vec::new());
        assert_eq!(rules.rules_for(NodeKind::Publication).count(), 0);
        assert!(rules.is_empty());
    }
}
