//! Data model for captured element trees and the raw structural diff.
//!
//! A capture is a flat, ordered arena: depth-first pre-order, each node
//! carrying its nesting depth. Parents immediately precede their subtree, so
//! order plus depth encodes the full hierarchy without parent pointers. The
//! locator and the text resolver both lean on that ordering.

use crate::geometry::{Frame, Point};
use serde::{Deserialize, Serialize};

/// One node of a captured accessibility tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementNode {
    /// Platform role tag, e.g. `AXButton` or `AXStaticText`.
    pub role: String,
    #[serde(default, skip_serializing_if = "is_empty_string")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<Frame>,
    /// Nesting depth within the capture; roots sit at depth zero.
    #[serde(default)]
    pub depth: usize,
}

impl ElementNode {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            text: None,
            frame: None,
            depth: 0,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn at_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// True when the node carries its own non-empty text.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn origin(&self) -> Option<Point> {
        self.frame.map(|f| f.origin())
    }
}

fn is_empty_string(opt: &Option<String>) -> bool {
    match opt {
        Some(s) => s.is_empty(),
        None => true,
    }
}

/// Flat pre-order capture of a window's element tree at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraversalSnapshot {
    pub nodes: Vec<ElementNode>,
}

impl TraversalSnapshot {
    pub fn new(nodes: Vec<ElementNode>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ElementNode> {
        self.nodes.get(index)
    }

    /// Indices of the top-level entries (depth zero).
    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.depth == 0)
            .map(|(index, _)| index)
    }

    /// Indices of the direct children of `index`, in traversal order.
    pub fn children_of(&self, index: usize) -> Vec<usize> {
        let Some(parent) = self.nodes.get(index) else {
            return Vec::new();
        };
        let mut children = Vec::new();
        for (offset, node) in self.nodes[index + 1..].iter().enumerate() {
            if node.depth <= parent.depth {
                break;
            }
            if node.depth == parent.depth + 1 {
                children.push(index + 1 + offset);
            }
        }
        children
    }

    /// Frame of the first window-role node in the capture, if any.
    pub fn window_frame(&self) -> Option<Frame> {
        self.nodes
            .iter()
            .find(|node| node.role.to_lowercase().contains("window"))
            .and_then(|node| node.frame)
    }
}

/// One attribute-level change on a modified node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
}

impl AttributeChange {
    pub fn new(
        name: impl Into<String>,
        removed: Option<String>,
        added: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            removed,
            added,
        }
    }
}

/// A node that survived between two captures but changed attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifiedNode {
    pub before: ElementNode,
    pub after: ElementNode,
    #[serde(default)]
    pub changes: Vec<AttributeChange>,
}

/// Structural diff between two captures, produced by the surrounding system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDiff {
    #[serde(default)]
    pub added: Vec<ElementNode>,
    #[serde(default)]
    pub removed: Vec<ElementNode>,
    #[serde(default)]
    pub modified: Vec<ModifiedNode>,
}

impl RawDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}
