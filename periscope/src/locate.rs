//! Element location over a captured arena: by screen point and by text.

use crate::geometry::{Frame, Point};
use crate::text::{resolve_text, ResolverConfig};
use crate::tree::TraversalSnapshot;

/// Recursion cap for point search. Real trees rarely pass 15 levels; anything
/// deeper is almost certainly a cycle introduced by a misbehaving backend.
pub const DEFAULT_MAX_DEPTH: usize = 25;

/// Vertical margin trimmed off the viewport while searching for text, so an
/// element half-hidden under the title bar or the bottom edge is not treated
/// as revealed.
pub const VIEWPORT_VERTICAL_INSET: f64 = 15.0;

/// Deepest node whose frame contains `point`, as an index into the capture.
///
/// Children may extend beyond a scrollable parent's visible frame, so the
/// search descends into every child regardless of whether the parent's own
/// frame contains the point. Matches surface on the way back out of the
/// recursion: a hit in a subtree beats the node itself.
pub fn node_at_point(
    snapshot: &TraversalSnapshot,
    point: Point,
    max_depth: usize,
) -> Option<usize> {
    snapshot
        .roots()
        .find_map(|root| descend(snapshot, root, point, 0, max_depth))
}

fn descend(
    snapshot: &TraversalSnapshot,
    index: usize,
    point: Point,
    depth: usize,
    max_depth: usize,
) -> Option<usize> {
    if depth > max_depth {
        return None;
    }
    for child in snapshot.children_of(index) {
        if let Some(hit) = descend(snapshot, child, point, depth + 1, max_depth) {
            return Some(hit);
        }
    }
    let node = &snapshot.nodes[index];
    match node.frame {
        Some(frame) if frame.contains(point) => Some(index),
        _ => None,
    }
}

/// Center of the first node whose resolved text equals `text` exactly and
/// whose center sits inside the vertically inset viewport.
///
/// Exact match only: scroll tracking has to lock onto one element, not a
/// class of similarly labeled ones.
pub fn point_for_text(
    snapshot: &TraversalSnapshot,
    text: &str,
    viewport: Frame,
    config: &ResolverConfig,
    max_depth: usize,
) -> Option<Point> {
    let search_region = viewport.inset_vertical(VIEWPORT_VERTICAL_INSET);
    snapshot.nodes.iter().find_map(|node| {
        if node.depth > max_depth {
            return None;
        }
        let center = node.frame?.center();
        if !search_region.contains(center) {
            return None;
        }
        match resolve_text(snapshot, node, config) {
            Some(resolved) if resolved == text => Some(center),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ElementNode;

    fn layered() -> TraversalSnapshot {
        TraversalSnapshot::new(vec![
            ElementNode::new("AXWindow").with_frame(Frame::new(0.0, 0.0, 800.0, 600.0)),
            ElementNode::new("AXGroup")
                .with_frame(Frame::new(0.0, 0.0, 800.0, 600.0))
                .at_depth(1),
            ElementNode::new("AXButton")
                .with_text("Deep")
                .with_frame(Frame::new(100.0, 100.0, 50.0, 20.0))
                .at_depth(2),
            ElementNode::new("AXStaticText")
                .with_text("Sibling")
                .with_frame(Frame::new(300.0, 300.0, 60.0, 20.0))
                .at_depth(1),
        ])
    }

    #[test]
    fn test_point_prefers_deepest_match() {
        let snapshot = layered();
        let hit = node_at_point(&snapshot, Point::new(110.0, 110.0), DEFAULT_MAX_DEPTH);
        assert_eq!(hit, Some(2));
    }

    #[test]
    fn test_point_falls_back_to_container() {
        let snapshot = layered();
        // Nothing deep covers (700, 50); the group and window both do, and
        // the group unwinds first.
        let hit = node_at_point(&snapshot, Point::new(700.0, 50.0), DEFAULT_MAX_DEPTH);
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn test_point_outside_everything() {
        let snapshot = layered();
        assert_eq!(
            node_at_point(&snapshot, Point::new(900.0, 900.0), DEFAULT_MAX_DEPTH),
            None
        );
    }

    #[test]
    fn test_match_never_excludes_point() {
        let snapshot = layered();
        for point in [
            Point::new(110.0, 110.0),
            Point::new(310.0, 310.0),
            Point::new(700.0, 50.0),
        ] {
            if let Some(index) = node_at_point(&snapshot, point, DEFAULT_MAX_DEPTH) {
                let frame = snapshot.nodes[index].frame.unwrap();
                assert!(frame.contains(point), "hit at {index} excludes {point:?}");
            }
        }
    }

    #[test]
    fn test_children_beyond_parent_frame_still_found() {
        // A scrolled container whose child sits below the container's own
        // visible frame.
        let snapshot = TraversalSnapshot::new(vec![
            ElementNode::new("AXScrollArea").with_frame(Frame::new(0.0, 0.0, 400.0, 300.0)),
            ElementNode::new("AXButton")
                .with_text("Below the fold")
                .with_frame(Frame::new(50.0, 900.0, 100.0, 30.0))
                .at_depth(1),
        ]);
        let hit = node_at_point(&snapshot, Point::new(60.0, 910.0), DEFAULT_MAX_DEPTH);
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn test_depth_budget_cuts_search() {
        let snapshot = layered();
        // With a zero budget only the roots themselves are eligible.
        let hit = node_at_point(&snapshot, Point::new(110.0, 110.0), 0);
        assert_eq!(hit, Some(0));
    }

    #[test]
    fn test_text_lookup_is_exact() {
        let snapshot = layered();
        let viewport = Frame::new(0.0, 0.0, 800.0, 600.0);
        let config = ResolverConfig::default();
        assert!(
            point_for_text(&snapshot, "Deep", viewport, &config, DEFAULT_MAX_DEPTH).is_some()
        );
        assert!(
            point_for_text(&snapshot, "Dee", viewport, &config, DEFAULT_MAX_DEPTH).is_none()
        );
        assert!(
            point_for_text(&snapshot, "deep", viewport, &config, DEFAULT_MAX_DEPTH).is_none()
        );
    }

    #[test]
    fn test_text_lookup_respects_inset() {
        let snapshot = TraversalSnapshot::new(vec![ElementNode::new("AXButton")
            .with_text("Edge")
            .with_frame(Frame::new(100.0, 0.0, 60.0, 20.0))]);
        let viewport = Frame::new(0.0, 0.0, 800.0, 600.0);
        let config = ResolverConfig::default();
        // Center y is 10, inside the raw viewport but above the inset band.
        assert!(
            point_for_text(&snapshot, "Edge", viewport, &config, DEFAULT_MAX_DEPTH).is_none()
        );
    }
}
