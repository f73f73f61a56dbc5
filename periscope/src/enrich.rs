//! Turn raw structural diffs and traversals into compact, de-noised reports.
//!
//! The raw diff between two captures is dominated by chrome: scrollbar
//! thumbs that moved, containers that re-laid out, coordinate-only attribute
//! churn. The pipeline strips all of it, recovers text for what remains, and
//! tags each survivor with whether it sits inside the viewport, so an
//! automated caller can reason about what actually happened.

use crate::geometry::Frame;
use crate::noise;
use crate::text::{resolve_text, ResolverConfig};
use crate::tree::{AttributeChange, ElementNode, RawDiff, TraversalSnapshot};
use serde::{Deserialize, Serialize};

/// An element as reported to callers: role and frame from the capture, text
/// from the resolver, and viewport membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedElement {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
    /// None when the element has no frame or no viewport was available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_viewport: Option<bool>,
}

/// A surviving modified pair with its meaningful attribute changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedModification {
    pub before: EnrichedElement,
    pub after: EnrichedElement,
    pub changes: Vec<AttributeChange>,
}

/// The de-noised change report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDiff {
    #[serde(default)]
    pub added: Vec<EnrichedElement>,
    #[serde(default)]
    pub removed: Vec<EnrichedElement>,
    #[serde(default)]
    pub modified: Vec<EnrichedModification>,
}

impl EnrichedDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Viewport membership from the element's origin against the raw viewport.
/// Deliberately not the inset band used during scroll search: reporting is
/// about what is on screen, not about what is safely clickable.
fn viewport_membership(node: &ElementNode, viewport: Option<Frame>) -> Option<bool> {
    match (node.origin(), viewport) {
        (Some(origin), Some(viewport)) => Some(viewport.contains(origin)),
        _ => None,
    }
}

fn enrich_node(
    node: &ElementNode,
    snapshot: &TraversalSnapshot,
    viewport: Option<Frame>,
    config: &ResolverConfig,
) -> EnrichedElement {
    EnrichedElement {
        role: node.role.clone(),
        text: resolve_text(snapshot, node, config),
        frame: node.frame,
        in_viewport: viewport_membership(node, viewport),
    }
}

/// Filter, enrich, filter again. The first pass is role-only (scroll chrome
/// never survives); the structural-container pass runs after text resolution,
/// so a container whose text can be recovered stays in the report.
fn enrich_nodes(
    nodes: &[ElementNode],
    snapshot: &TraversalSnapshot,
    viewport: Option<Frame>,
    config: &ResolverConfig,
) -> Vec<EnrichedElement> {
    nodes
        .iter()
        .filter(|node| !noise::is_scroll_chrome(&node.role))
        .map(|node| enrich_node(node, snapshot, viewport, config))
        .filter(|element| !noise::is_structural_container(&element.role, element.text.as_deref()))
        .collect()
}

/// Enrich a raw diff against its two source captures. Added nodes resolve
/// against the `after` capture, removed nodes against `before`. Output order
/// follows input order within each category.
pub fn enrich_diff(
    raw: &RawDiff,
    before: &TraversalSnapshot,
    after: &TraversalSnapshot,
    viewport: Option<Frame>,
    config: &ResolverConfig,
) -> EnrichedDiff {
    let added = enrich_nodes(&raw.added, after, viewport, config);
    let removed = enrich_nodes(&raw.removed, before, viewport, config);

    let modified = raw
        .modified
        .iter()
        .filter_map(|pair| {
            if noise::is_scroll_chrome(&pair.before.role)
                || noise::is_scroll_chrome(&pair.after.role)
            {
                return None;
            }
            let changes: Vec<AttributeChange> = pair
                .changes
                .iter()
                .filter(|change| !noise::is_geometry_attribute(&change.name))
                .cloned()
                .collect();
            if changes.is_empty() {
                // Pure movement; the element did not change, the scroll did.
                return None;
            }
            Some(EnrichedModification {
                before: enrich_node(&pair.before, before, viewport, config),
                after: enrich_node(&pair.after, after, viewport, config),
                changes,
            })
        })
        .collect();

    EnrichedDiff {
        added,
        removed,
        modified,
    }
}

/// Full-tree variant for callers that want the current state rather than a
/// delta. Same filtering and tagging as the diff path, order preserved.
pub fn enrich_traversal(
    snapshot: &TraversalSnapshot,
    viewport: Option<Frame>,
    config: &ResolverConfig,
) -> Vec<EnrichedElement> {
    enrich_nodes(&snapshot.nodes, snapshot, viewport, config)
}
