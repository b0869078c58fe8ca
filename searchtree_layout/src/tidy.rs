// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered tidy layout: leaves on consecutive slots, parents centred above.

use kurbo::{Point, Size};
use searchtree_node::{NodeId, SearchTree};

use crate::pass::{LayoutPass, PositionedNode, TreeLayout};

/// Top-down layered layout.
///
/// Visible leaves are placed left to right on consecutive horizontal slots,
/// each parent is centred over its first and last visible child, and depth
/// maps to rows. The root ends up at `x = 0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TidyLayout {
    /// Slots between adjacent leaves that share a parent.
    pub sibling_separation: f64,
    /// Slots between adjacent leaves with different parents.
    pub cousin_separation: f64,
}

impl Default for TidyLayout {
    fn default() -> Self {
        Self {
            sibling_separation: 1.0,
            cousin_separation: 2.0,
        }
    }
}

/// One node on the walk stack: where it sits in the output, how many of its
/// visible children have been visited, and the slots of the first and last
/// placed child.
struct Frame<'a> {
    at: usize,
    children: &'a [NodeId],
    cursor: usize,
    first: Option<f64>,
    last: Option<f64>,
}

impl TidyLayout {
    /// Place every visible node below `root`.
    ///
    /// Pre-order output, post-order slot assignment, with an explicit stack
    /// so depth is bounded by memory rather than the call stack. Returns the
    /// nodes (x holding the slot) and the root's slot.
    fn place(&self, tree: &SearchTree, root: NodeId) -> Option<(Vec<PositionedNode>, f64)> {
        let mut nodes = Vec::with_capacity(tree.len());
        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut next_slot: Option<(f64, Option<NodeId>)> = None;

        let node = tree.get(root)?;
        nodes.push(PositionedNode {
            id: root,
            parent: node.parent(),
            depth: 0,
            position: Point::ZERO,
        });
        stack.push(Frame {
            at: 0,
            children: node.visible_children(),
            cursor: 0,
            first: None,
            last: None,
        });

        while let Some(top) = stack.last_mut() {
            if let Some(&child) = top.children.get(top.cursor) {
                top.cursor += 1;
                let Some(child_node) = tree.get(child) else {
                    continue;
                };
                let depth = nodes[top.at].depth + 1;
                stack.push(Frame {
                    at: nodes.len(),
                    children: child_node.visible_children(),
                    cursor: 0,
                    first: None,
                    last: None,
                });
                nodes.push(PositionedNode {
                    id: child,
                    parent: child_node.parent(),
                    depth,
                    position: Point::ZERO,
                });
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            let parent = nodes[done.at].parent;
            let slot = match (done.first, done.last) {
                (Some(a), Some(b)) => (a + b) / 2.0,
                _ => {
                    let slot = match next_slot {
                        None => 0.0,
                        Some((prev, prev_parent)) if prev_parent == parent => {
                            prev + self.sibling_separation
                        }
                        Some((prev, _)) => prev + self.cousin_separation,
                    };
                    next_slot = Some((slot, parent));
                    slot
                }
            };
            nodes[done.at].position.x = slot;
            match stack.last_mut() {
                Some(up) => {
                    up.first.get_or_insert(slot);
                    up.last = Some(slot);
                }
                None => return Some((nodes, slot)),
            }
        }
        None
    }
}

impl TreeLayout for TidyLayout {
    fn layout(&self, tree: &SearchTree, node_size: Size) -> LayoutPass {
        let Some((mut nodes, root_slot)) = tree.root().and_then(|root| self.place(tree, root))
        else {
            return LayoutPass::default();
        };
        for n in &mut nodes {
            n.position = Point::new(
                (n.position.x - root_slot) * node_size.width,
                f64::from(n.depth) * node_size.height,
            );
        }
        LayoutPass::from_nodes(nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchtree_node::NodeData;

    fn id(n: u32) -> NodeId {
        NodeId::new(n)
    }

    fn data(child_count: u32, desc_count: u32) -> NodeData {
        NodeData {
            child_count,
            desc_count,
            ..Default::default()
        }
    }

    // 0 ─┬─ 1 ─┬─ 2
    //    │     └─ 3
    //    └─ 4 ─── 5
    fn tree() -> SearchTree {
        let mut t = SearchTree::new();
        t.insert(None, id(0), data(2, 5)).unwrap();
        t.insert(Some(id(0)), id(1), data(2, 2)).unwrap();
        t.insert(Some(id(1)), id(2), data(0, 0)).unwrap();
        t.insert(Some(id(1)), id(3), data(0, 0)).unwrap();
        t.insert(Some(id(0)), id(4), data(1, 1)).unwrap();
        t.insert(Some(id(4)), id(5), data(0, 0)).unwrap();
        t
    }

    #[test]
    fn slots_and_rows() {
        let pass = TidyLayout::default().layout(&tree(), Size::new(10.0, 30.0));
        let ids: Vec<_> = pass.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![id(0), id(1), id(2), id(3), id(4), id(5)], "pre-order");
        // Leaf slots: 2 → 0, 3 → 1 (sibling), 5 → 3 (cousin).
        // 1 → 0.5, 4 → 3, root → 1.75.
        let x = |n| pass.position_of(id(n)).unwrap().x;
        assert_eq!(x(0), 0.0, "root at origin");
        assert_eq!(x(2), -17.5);
        assert_eq!(x(3), -7.5);
        assert_eq!(x(1), -12.5);
        assert_eq!(x(5), 12.5);
        assert_eq!(x(4), 12.5);
        assert_eq!(pass.position_of(id(5)).unwrap().y, 60.0);
        assert_eq!(pass.links().len(), 5);
    }

    #[test]
    fn only_visible_nodes_are_laid_out() {
        let mut t = tree();
        t.toggle(id(1));
        let pass = TidyLayout::default().layout(&t, Size::new(10.0, 10.0));
        assert_eq!(pass.len(), 4);
        assert!(pass.position_of(id(2)).is_none());
        // 1 is now a leaf of the visible tree.
        assert!(pass.position_of(id(1)).is_some());
    }

    #[test]
    fn empty_tree_lays_out_nothing() {
        let pass = TidyLayout::default().layout(&SearchTree::new(), Size::new(1.0, 1.0));
        assert!(pass.is_empty());
        assert!(pass.links().is_empty());
    }

    #[test]
    fn deep_chain_does_not_exhaust_the_stack() {
        const DEPTH: u32 = 100_000;
        let mut t = SearchTree::new();
        t.insert(None, id(0), data(1, DEPTH)).unwrap();
        for i in 1..=DEPTH {
            let child_count = u32::from(i < DEPTH);
            t.insert(Some(id(i - 1)), id(i), data(child_count, DEPTH - i))
                .unwrap();
        }
        let pass = TidyLayout::default().layout(&t, Size::new(10.0, 10.0));
        assert_eq!(pass.len(), 100_001);
        assert_eq!(pass.links().len(), 100_000);
        let bottom = pass.position_of(id(DEPTH)).unwrap();
        assert_eq!(bottom, Point::new(0.0, 1_000_000.0), "a chain stays on the root's column");
    }

    #[test]
    fn single_root_sits_at_origin() {
        let mut t = SearchTree::new();
        t.insert(None, id(0), data(3, 40)).unwrap();
        let pass = TidyLayout::default().layout(&t, Size::new(50.0, 50.0));
        assert_eq!(pass.position_of(id(0)), Some(Point::ZERO));
    }
}
