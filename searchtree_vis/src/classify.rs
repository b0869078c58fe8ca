// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-pass visual classification of nodes and links.

use bitflags::bitflags;
use hashbrown::HashSet;
use searchtree_node::{NodeId, NodeRef};

use crate::history::PositionHistory;

bitflags! {
    /// Visual classes of a node.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeClass: u8 {
        /// The externally selected node.
        const SELECTED   = 0b0000_0001;
        /// Some children are hidden or not yet fetched.
        const HAS_OTHERS = 0b0000_0010;
        /// Subtree already fully seen and it held no solution.
        const EXPLORED   = 0b0000_0100;
        /// Off the solution path (or the problem is unsolvable).
        const RED        = 0b0000_1000;
        /// A solution node.
        const SOLUTION   = 0b0001_0000;
    }
}

bitflags! {
    /// Visual classes of a link.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LinkClass: u8 {
        /// Leads off the solution path (or the problem is unsolvable).
        const RED       = 0b0000_0001;
        /// The newest decision since the compared tree.
        const DIFFERENT = 0b0000_0010;
    }
}

/// Everything classification needs besides the node itself.
///
/// `history` must be the history from *before* the current pass is committed.
#[derive(Copy, Clone, Debug)]
pub struct Classifier<'a> {
    /// Selected node.
    pub selected: Option<NodeId>,
    /// Ids on the path from the root to a solution.
    pub solution_ancestors: &'a HashSet<NodeId>,
    /// Whether the problem has a solution at all.
    pub solvable: bool,
    /// Node whose next decision edge is highlighted.
    pub diff_parent: Option<NodeId>,
    /// Positions from previous passes.
    pub history: &'a PositionHistory,
}

impl Classifier<'_> {
    fn off_solution_path(&self, id: NodeId) -> bool {
        !self.solution_ancestors.contains(&id) || !self.solvable
    }

    /// Whether `node`'s subtree has been seen in full and held no solution.
    ///
    /// The check assumes depth-first numbering: it asks whether every id in
    /// `id + 1 ..= id + desc_count` has been laid out before. Trees that
    /// break the numbering get false negatives, never false positives on
    /// contiguous input.
    pub fn is_explored(&self, node: NodeRef<'_>) -> bool {
        node.visible_children().is_empty()
            && !self.solution_ancestors.contains(&node.id())
            && self
                .history
                .contains_range_after(node.id(), node.data().desc_count)
    }

    /// Classes for a node in the current pass.
    pub fn classify_node(&self, node: NodeRef<'_>) -> NodeClass {
        let id = node.id();
        let explored = self.is_explored(node);
        let mut class = NodeClass::empty();
        class.set(NodeClass::SELECTED, self.selected == Some(id));
        class.set(NodeClass::HAS_OTHERS, node.has_more_children());
        class.set(NodeClass::EXPLORED, explored);
        class.set(NodeClass::RED, self.off_solution_path(id) && !explored);
        class.set(NodeClass::SOLUTION, node.data().is_solution);
        class
    }

    /// Classes for the link `source → target`.
    pub fn classify_link(&self, source: NodeId, target: NodeId) -> LinkClass {
        let mut class = LinkClass::empty();
        class.set(LinkClass::RED, self.off_solution_path(target));
        class.set(
            LinkClass::DIFFERENT,
            source.offset(1) == Some(target) && self.diff_parent == Some(source),
        );
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use searchtree_node::{NodeData, SearchTree};

    fn id(n: u32) -> NodeId {
        NodeId::new(n)
    }

    // root(0) → child(1), child is a leaf solution.
    fn solved() -> SearchTree {
        let mut t = SearchTree::new();
        t.insert(
            None,
            id(0),
            NodeData {
                child_count: 1,
                desc_count: 1,
                ..Default::default()
            },
        )
        .unwrap();
        t.insert(
            Some(id(0)),
            id(1),
            NodeData {
                is_solution: true,
                ..Default::default()
            },
        )
        .unwrap();
        t
    }

    fn ancestors(ids: &[u32]) -> HashSet<NodeId> {
        ids.iter().copied().map(NodeId::new).collect()
    }

    #[test]
    fn solution_on_path_is_not_red() {
        let t = solved();
        let sol = ancestors(&[0, 1]);
        let history = PositionHistory::new();
        let c = Classifier {
            selected: None,
            solution_ancestors: &sol,
            solvable: true,
            diff_parent: None,
            history: &history,
        };
        let class = c.classify_node(t.get(id(1)).unwrap());
        assert!(class.contains(NodeClass::SOLUTION));
        assert!(!class.contains(NodeClass::RED));
        assert!(!class.contains(NodeClass::EXPLORED), "on the solution path");
    }

    #[test]
    fn dead_leaf_is_explored_not_red() {
        let mut t = solved();
        t.update_data(id(1), NodeData::default()).unwrap();
        let sol = ancestors(&[0]);
        let history = PositionHistory::new();
        let c = Classifier {
            selected: Some(id(1)),
            solution_ancestors: &sol,
            solvable: true,
            diff_parent: None,
            history: &history,
        };
        let class = c.classify_node(t.get(id(1)).unwrap());
        assert!(class.contains(NodeClass::EXPLORED), "empty range is trivially seen");
        assert!(!class.contains(NodeClass::RED), "explored wins over red");
        assert!(class.contains(NodeClass::SELECTED));
    }

    #[test]
    fn explored_needs_whole_range_in_history() {
        let mut t = SearchTree::new();
        t.insert(
            None,
            id(0),
            NodeData {
                child_count: 2,
                desc_count: 3,
                ..Default::default()
            },
        )
        .unwrap();
        t.collapse(id(0));
        let sol = HashSet::new();
        let mut history = PositionHistory::new();
        history.upsert(id(1), Point::ZERO);
        history.upsert(id(2), Point::ZERO);
        let node = t.get(id(0)).unwrap();
        {
            let c = Classifier {
                selected: None,
                solution_ancestors: &sol,
                solvable: true,
                diff_parent: None,
                history: &history,
            };
            assert!(!c.is_explored(node), "id 3 never laid out");
            let class = c.classify_node(node);
            assert!(class.contains(NodeClass::RED | NodeClass::HAS_OTHERS));
        }

        history.upsert(id(3), Point::ZERO);
        let c = Classifier {
            selected: None,
            solution_ancestors: &sol,
            solvable: true,
            diff_parent: None,
            history: &history,
        };
        assert!(c.is_explored(node));
        assert!(!c.classify_node(node).contains(NodeClass::RED));
    }

    #[test]
    fn expanded_nodes_are_never_explored() {
        let t = solved();
        let sol = HashSet::new();
        let mut history = PositionHistory::new();
        history.upsert(id(1), Point::ZERO);
        let c = Classifier {
            selected: None,
            solution_ancestors: &sol,
            solvable: true,
            diff_parent: None,
            history: &history,
        };
        assert!(!c.is_explored(t.get(id(0)).unwrap()));
    }

    #[test]
    fn unsolvable_turns_everything_red() {
        let t = solved();
        let sol = ancestors(&[0, 1]);
        let history = PositionHistory::new();
        let c = Classifier {
            selected: None,
            solution_ancestors: &sol,
            solvable: false,
            diff_parent: None,
            history: &history,
        };
        assert!(c.classify_node(t.get(id(0)).unwrap()).contains(NodeClass::RED));
        assert!(c.classify_link(id(0), id(1)).contains(LinkClass::RED));
    }

    #[test]
    fn diff_highlight_is_next_id_from_marker() {
        let sol = ancestors(&[0, 1, 2]);
        let history = PositionHistory::new();
        let c = Classifier {
            selected: None,
            solution_ancestors: &sol,
            solvable: true,
            diff_parent: Some(id(1)),
            history: &history,
        };
        assert_eq!(c.classify_link(id(1), id(2)), LinkClass::DIFFERENT);
        assert_eq!(c.classify_link(id(1), id(5)), LinkClass::RED);
        assert_eq!(c.classify_link(id(0), id(1)), LinkClass::empty());
    }
}
