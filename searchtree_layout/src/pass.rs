// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positioned output of one layout pass.

use hashbrown::HashMap;
use kurbo::{CubicBez, Point, Size};
use searchtree_node::{NodeId, SearchTree};

/// A tree layout capability.
///
/// Given the visible part of a tree and the cell size of one node, place
/// every visible node. Implementations are stateless and lay out the whole
/// visible tree on every call.
pub trait TreeLayout {
    /// Lay out the visible subtree of `tree`.
    fn layout(&self, tree: &SearchTree, node_size: Size) -> LayoutPass;
}

/// One laid-out node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionedNode {
    /// Node id.
    pub id: NodeId,
    /// Parent id (`None` for the root).
    pub parent: Option<NodeId>,
    /// Distance from the root.
    pub depth: u32,
    /// Centre in layout space.
    pub position: Point,
}

/// One laid-out parent→child edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionedLink {
    /// Parent id.
    pub source: NodeId,
    /// Child id.
    pub target: NodeId,
    /// Curve from parent centre to child centre.
    pub curve: CubicBez,
}

/// Nodes and links for the visible tree, in pre-order.
#[derive(Clone, Debug, Default)]
pub struct LayoutPass {
    nodes: Vec<PositionedNode>,
    links: Vec<PositionedLink>,
    index: HashMap<NodeId, usize>,
}

impl LayoutPass {
    /// Build a pass from pre-ordered nodes. Links are derived from parent ids.
    pub fn from_nodes(nodes: Vec<PositionedNode>) -> Self {
        let index: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        let links = nodes
            .iter()
            .filter_map(|n| {
                let parent = n.parent?;
                let source = nodes[*index.get(&parent)?].position;
                Some(PositionedLink {
                    source: parent,
                    target: n.id,
                    curve: link_curve(source, n.position),
                })
            })
            .collect();
        Self {
            nodes,
            links,
            index,
        }
    }

    /// Laid-out nodes, pre-order.
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// Laid-out links, ordered by target in pre-order.
    pub fn links(&self) -> &[PositionedLink] {
        &self.links
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Option<&PositionedNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Position of `id`, if it was laid out.
    pub fn position_of(&self, id: NodeId) -> Option<Point> {
        self.node(id).map(|n| n.position)
    }

    /// Number of laid-out nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was laid out.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Vertical link from `source` down to `target`.
///
/// Both control points sit at the vertical midpoint, so links leave the
/// parent and enter the child vertically.
pub fn link_curve(source: Point, target: Point) -> CubicBez {
    let mid_y = (source.y + target.y) / 2.0;
    CubicBez::new(
        source,
        Point::new(source.x, mid_y),
        Point::new(target.x, mid_y),
        target,
    )
}

/// Zero-length link at `at`; links grow out of and shrink into these.
pub fn collapsed_link(at: Point) -> CubicBez {
    link_curve(at, at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_follow_parents() {
        let n = |id: u32, parent: Option<u32>, x: f64, y: f64| PositionedNode {
            id: NodeId::new(id),
            parent: parent.map(NodeId::new),
            depth: 0,
            position: Point::new(x, y),
        };
        let pass = LayoutPass::from_nodes(vec![
            n(0, None, 0.0, 0.0),
            n(1, Some(0), -10.0, 30.0),
            n(2, Some(0), 10.0, 30.0),
            n(5, Some(4), 0.0, 60.0),
        ]);
        assert_eq!(pass.links().len(), 2, "edge to an absent parent is dropped");
        assert_eq!(pass.links()[1].target, NodeId::new(2));
        assert_eq!(pass.links()[1].curve.p0, Point::ZERO);
        assert_eq!(pass.links()[1].curve.p3, Point::new(10.0, 30.0));
        assert_eq!(pass.position_of(NodeId::new(1)), Some(Point::new(-10.0, 30.0)));
        assert_eq!(pass.position_of(NodeId::new(9)), None);
    }

    #[test]
    fn curve_shape() {
        let c = link_curve(Point::new(0.0, 0.0), Point::new(20.0, 40.0));
        assert_eq!(c.p1, Point::new(0.0, 20.0));
        assert_eq!(c.p2, Point::new(20.0, 20.0));
        let z = collapsed_link(Point::new(3.0, 4.0));
        assert_eq!(z.p0, z.p3);
        assert_eq!(z.p1, Point::new(3.0, 4.0));
    }
}
