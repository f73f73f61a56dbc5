//! Text recovery for nodes that carry none of their own.
//!
//! Containers and cells frequently surface without a title even though a
//! textual child sits right inside them. Two strategies run in order: spatial
//! containment for nodes with usable geometry, then a short forward scan in
//! traversal order for nodes without any. The forward scan relies on the
//! pre-order capture invariant: a node's subtree follows it immediately.

use crate::tree::{ElementNode, TraversalSnapshot};
use serde::{Deserialize, Serialize};

/// Tuning for node re-identification and the proximity scan. The defaults are
/// calibrated against real accessibility captures; trees with unusually deep
/// leaf fan-out may need a wider scan window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Coordinate slack when matching a node back into a snapshot.
    pub coordinate_tolerance: f64,
    /// How many entries past the node the proximity scan may inspect.
    pub forward_scan_window: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            coordinate_tolerance: 2.0,
            forward_scan_window: 5,
        }
    }
}

/// Best-effort display text for `node`. A node with its own non-empty text
/// resolves to it directly; otherwise containment, then proximity. Returns
/// None when nothing textual can be tied to the node.
pub fn resolve_text(
    snapshot: &TraversalSnapshot,
    node: &ElementNode,
    config: &ResolverConfig,
) -> Option<String> {
    if node.has_text() {
        return node.text.clone();
    }
    resolve_by_containment(snapshot, node)
        .or_else(|| resolve_by_proximity(snapshot, node, config))
}

/// First textual node whose origin falls inside `node`'s frame.
fn resolve_by_containment(snapshot: &TraversalSnapshot, node: &ElementNode) -> Option<String> {
    let frame = node.frame?;
    snapshot.nodes.iter().find_map(|other| {
        if !other.has_text() {
            return None;
        }
        let origin = other.origin()?;
        if frame.contains(origin) {
            other.text.clone()
        } else {
            None
        }
    })
}

/// Forward scan from the node's position in the capture. Stops at the end of
/// the scan window or when the scan crosses into a sibling row, whichever
/// comes first.
fn resolve_by_proximity(
    snapshot: &TraversalSnapshot,
    node: &ElementNode,
    config: &ResolverConfig,
) -> Option<String> {
    let index = index_of(snapshot, node, config.coordinate_tolerance)?;
    for offset in 1..=config.forward_scan_window {
        let entry = snapshot.get(index + offset)?;
        if offset > 1 && is_row_boundary(&entry.role) {
            return None;
        }
        if entry.has_text() {
            return entry.text.clone();
        }
    }
    None
}

fn is_row_boundary(role: &str) -> bool {
    role.to_lowercase().contains("row")
}

/// Re-identify `node` inside `snapshot` by role and approximate origin.
/// Nodes without frames on both sides match on role alone; the first
/// candidate in traversal order wins.
fn index_of(
    snapshot: &TraversalSnapshot,
    node: &ElementNode,
    tolerance: f64,
) -> Option<usize> {
    snapshot.nodes.iter().position(|candidate| {
        if candidate.role != node.role {
            return false;
        }
        match (candidate.origin(), node.origin()) {
            (Some(a), Some(b)) => {
                (a.x - b.x).abs() <= tolerance && (a.y - b.y).abs() <= tolerance
            }
            (None, None) => true,
            _ => false,
        }
    })
}
