// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the search tree: node identifiers, per-node data, and visibility state.

use core::fmt;

use smallvec::SmallVec;

/// Radius of a node whose children are all materialized and visible.
pub const MIN_RADIUS: f64 = 10.0;

/// Vertical gap between a node's circle and its descendant-count label.
pub const DESC_LABEL_PADDING: f64 = 13.0;

/// Identifier for a node in the search tree.
///
/// Ids are assigned by the solver backend and never reassigned, so the same id
/// always resolves to the same logical decision across layout passes. They are
/// the only key used when reconciling one pass against the next.
///
/// Backends number nodes depth-first: a node's descendants occupy the ids
/// directly after it. See [`SearchTree::check_numbering`](crate::SearchTree::check_numbering).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a backend-assigned id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw backend id.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id `offset` places after this one, if it fits.
    pub const fn offset(self, offset: u32) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Materialized child list. Search trees are almost always binary.
pub type Children = SmallVec<[NodeId; 2]>;

/// Descriptive data for one decision node, as supplied by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeData {
    /// Short decision label (for example `x = 3`).
    pub label: String,
    /// Human-friendly rendering of the decision.
    pub pretty_label: String,
    /// True number of children in the full search tree.
    ///
    /// May exceed the number of children the backend has sent so far.
    pub child_count: u32,
    /// Number of descendants in the full search tree.
    pub desc_count: u32,
    /// Whether this node is a solution.
    pub is_solution: bool,
    /// Decision-branch polarity (`x = v` rather than `x != v`).
    pub is_left_child: bool,
}

/// Where a node's materialized children currently live.
///
/// A node's children sit in exactly one place at a time, so the visible and
/// hidden sets are variants of one enum instead of two fields that must be
/// kept mutually exclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Visibility {
    /// `child_count == 0`: nothing below this node.
    Leaf,
    /// Children exist but none have been fetched yet.
    Unrevealed,
    /// Children are rendered.
    Expanded(Children),
    /// Children were rendered and are now hidden; they are kept so that
    /// re-expansion does not need the backend.
    Collapsed(Children),
}

impl Visibility {
    /// State of a node with no materialized children.
    pub fn empty(child_count: u32) -> Self {
        if child_count == 0 {
            Self::Leaf
        } else {
            Self::Unrevealed
        }
    }

    /// Children currently rendered (empty unless [`Visibility::Expanded`]).
    pub fn visible(&self) -> &[NodeId] {
        match self {
            Self::Expanded(c) => c,
            _ => &[],
        }
    }

    /// Children currently hidden (empty unless [`Visibility::Collapsed`]).
    pub fn hidden(&self) -> &[NodeId] {
        match self {
            Self::Collapsed(c) => c,
            _ => &[],
        }
    }

    /// All materialized children, visible or hidden.
    pub fn materialized(&self) -> &[NodeId] {
        match self {
            Self::Expanded(c) | Self::Collapsed(c) => c,
            Self::Leaf | Self::Unrevealed => &[],
        }
    }
}

/// Radius for a node with the given counts.
///
/// Fully expanded nodes get [`MIN_RADIUS`]. Everything else grows with the
/// logarithm of its descendant count so that huge unexplored subtrees stay
/// readable.
pub fn calculate_radius(child_count: u32, desc_count: u32, visible_children: usize) -> f64 {
    if visible_children > 0 && visible_children == child_count as usize {
        return MIN_RADIUS;
    }
    let size = (f64::from(desc_count) + MIN_RADIUS).ln() * 3.0;
    size.max(MIN_RADIUS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn empty_state_depends_on_child_count() {
        assert_eq!(Visibility::empty(0), Visibility::Leaf);
        assert_eq!(Visibility::empty(2), Visibility::Unrevealed);
    }

    #[test]
    fn views_match_variant() {
        let c: Children = smallvec![NodeId::new(3), NodeId::new(9)];
        let expanded = Visibility::Expanded(c.clone());
        let collapsed = Visibility::Collapsed(c.clone());
        assert_eq!(expanded.visible(), &c[..]);
        assert!(expanded.hidden().is_empty(), "expanded has no hidden set");
        assert_eq!(collapsed.hidden(), &c[..]);
        assert!(collapsed.visible().is_empty(), "collapsed has no visible set");
        assert_eq!(collapsed.materialized().len(), 2);
        assert!(Visibility::Unrevealed.materialized().is_empty());
    }

    #[test]
    fn radius_floor_and_growth() {
        // Fully expanded.
        assert_eq!(calculate_radius(2, 400, 2), MIN_RADIUS);
        // ln(10) * 3 < 10, so small subtrees are floored.
        assert_eq!(calculate_radius(0, 0, 0), MIN_RADIUS);
        assert_eq!(calculate_radius(2, 5, 0), MIN_RADIUS);
        let big = calculate_radius(2, 1000, 0);
        let bigger = calculate_radius(2, 100_000, 0);
        assert!(big > MIN_RADIUS, "large subtrees grow");
        assert!(bigger > big, "radius is monotone in desc_count");
        assert!((big - (1010.0_f64).ln() * 3.0).abs() < 1e-9);
    }

    #[test]
    fn radius_is_monotone() {
        let mut last = 0.0;
        for d in (0..50_000).step_by(97) {
            let r = calculate_radius(2, d, 1);
            assert!(r >= last, "radius decreased at desc_count {d}");
            last = r;
        }
    }

    #[test]
    fn offset_overflow() {
        assert_eq!(NodeId::new(4).offset(3), Some(NodeId::new(7)));
        assert_eq!(NodeId::new(u32::MAX).offset(1), None);
    }
}
