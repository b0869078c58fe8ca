// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Descendant-count → visual size scales.

use kurbo::Size;
use searchtree_node::SearchTree;

/// Maps a descendant count to a visual size.
///
/// Injected by the caller; the layout only uses it to size the cell every
/// node is laid out in.
pub trait SizeScale {
    /// Size for a subtree with `desc_count` descendants.
    fn scale(&self, desc_count: u32) -> f64;
}

impl<F: Fn(u32) -> f64> SizeScale for F {
    fn scale(&self, desc_count: u32) -> f64 {
        self(desc_count)
    }
}

/// Linear interpolation from a count domain onto a size range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearScale {
    /// Input interval.
    pub domain: (f64, f64),
    /// Output interval.
    pub range: (f64, f64),
    /// Clamp output to `range`.
    pub clamp: bool,
}

impl LinearScale {
    /// Scale mapping `domain` onto `range` without clamping.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Same scale, clamped to its range.
    pub fn clamped(self) -> Self {
        Self {
            clamp: true,
            ..self
        }
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new((0.0, 1000.0), (10.0, 40.0)).clamped()
    }
}

impl SizeScale for LinearScale {
    fn scale(&self, desc_count: u32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 {
            0.5
        } else {
            (f64::from(desc_count) - d0) / (d1 - d0)
        };
        let t = if self.clamp { t.clamp(0.0, 1.0) } else { t };
        r0 + (r1 - r0) * t
    }
}

/// Cell size every node is laid out in.
///
/// With labels, cells are as wide as the longest visible label (ten units
/// per character) and three max-radii tall so the text fits above the node.
/// Without labels, cells shrink to 1.5 max-radii square. The max radius is
/// the scale applied to the root's descendant count.
pub fn node_size(tree: &SearchTree, scale: &impl SizeScale, show_labels: bool) -> Size {
    let Some(root) = tree.root().and_then(|r| tree.get(r)) else {
        return Size::ZERO;
    };
    let max_radius = scale.scale(root.data().desc_count);
    if show_labels {
        let longest = tree
            .visible_preorder()
            .into_iter()
            .filter_map(|id| tree.get(id))
            .map(|n| n.data().label.chars().count())
            .max()
            .unwrap_or(0);
        #[allow(
            clippy::cast_precision_loss,
            reason = "label lengths are far below 2^52"
        )]
        let width = longest as f64 * 10.0;
        Size::new(width, max_radius * 3.0)
    } else {
        Size::new(max_radius * 1.5, max_radius * 1.5)
    }
}
