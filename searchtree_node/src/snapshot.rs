// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat tree snapshots from the solver backend and their ingestion.
//!
//! The backend sends nodes as a flat list linked by `parentId`, with `-1`
//! marking the root. Lists may arrive in any order, and later snapshots may
//! repeat nodes already seen (with refreshed counts) alongside new ones.

use hashbrown::{HashMap, HashSet};
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::tree::{Journal, SearchTree};
use crate::types::{NodeData, NodeId};

/// Parent id the backend uses for the root.
pub const ROOT_PARENT_ID: i64 = -1;

/// One node as sent by the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Backend id.
    pub id: u32,
    /// Parent id, or [`ROOT_PARENT_ID`].
    pub parent_id: i64,
    /// Short decision label.
    pub label: String,
    /// Human-friendly label.
    #[serde(default)]
    pub pretty_label: String,
    /// True number of children.
    pub child_count: u32,
    /// Whether this node is a solution.
    #[serde(default)]
    pub is_solution: bool,
    /// Decision-branch polarity.
    #[serde(default)]
    pub is_left_child: bool,
    /// Number of descendants in the full tree.
    pub desc_count: u32,
}

impl NodeRecord {
    /// Backend id as a [`NodeId`].
    pub fn node_id(&self) -> NodeId {
        NodeId::new(self.id)
    }

    /// Resolve the parent, mapping the root sentinel to `None`.
    pub fn parent(&self) -> Result<Option<NodeId>, TreeError> {
        if self.parent_id == ROOT_PARENT_ID {
            return Ok(None);
        }
        u32::try_from(self.parent_id)
            .map(|p| Some(NodeId::new(p)))
            .map_err(|_| TreeError::InvalidParentId {
                node: self.node_id(),
                parent_id: self.parent_id,
            })
    }

    /// Node data carried by this record.
    pub fn data(&self) -> NodeData {
        NodeData {
            label: self.label.clone(),
            pretty_label: self.pretty_label.clone(),
            child_count: self.child_count,
            desc_count: self.desc_count,
            is_solution: self.is_solution,
            is_left_child: self.is_left_child,
        }
    }
}

/// A batch of nodes plus the ids on the path to the found solution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    /// Nodes in any order.
    pub nodes: Vec<NodeRecord>,
    /// Ids from the root to a solution node.
    #[serde(default)]
    pub sol_ancestor_ids: Vec<u32>,
}

impl TreeSnapshot {
    /// Solution-ancestor ids as a set.
    pub fn solution_ancestors(&self) -> HashSet<NodeId> {
        self.sol_ancestor_ids.iter().copied().map(NodeId::new).collect()
    }
}

impl SearchTree {
    /// Build a tree from a snapshot.
    ///
    /// Fails fast on structural problems and on ids that break depth-first
    /// numbering (see [`SearchTree::check_numbering`]).
    pub fn from_snapshot(snapshot: &TreeSnapshot) -> Result<Self, TreeError> {
        let mut tree = Self::new();
        tree.apply_snapshot(snapshot)?;
        Ok(tree)
    }

    /// Merge a snapshot into this tree.
    ///
    /// Known ids get their data refreshed; new ids are attached under their
    /// parent, which may itself be new in the same batch. Returns the number of
    /// newly revealed nodes.
    ///
    /// On error the tree is left unchanged. Changes are journaled and undone
    /// on failure, and numbering is checked only around the touched nodes,
    /// so a batch costs time in proportion to its own size.
    pub fn apply_snapshot(&mut self, snapshot: &TreeSnapshot) -> Result<usize, TreeError> {
        let mut journal = Journal::default();
        match self.merge_records(&snapshot.nodes, &mut journal) {
            Ok(added) => Ok(added),
            Err(err) => {
                warn!("rejected tree snapshot: {err}");
                self.rollback(journal);
                Err(err)
            }
        }
    }

    fn merge_records(
        &mut self,
        records: &[NodeRecord],
        journal: &mut Journal,
    ) -> Result<usize, TreeError> {
        let mut seen = HashSet::with_capacity(records.len());
        // New nodes grouped by parent; `None` holds root candidates.
        let mut pending: HashMap<Option<NodeId>, Vec<&NodeRecord>> = HashMap::new();
        let mut pending_count = 0;
        for record in records {
            let id = record.node_id();
            if !seen.insert(id) {
                return Err(TreeError::DuplicateId(id));
            }
            let parent = record.parent()?;
            if self.contains(id) {
                trace!("refreshing node {id}");
                self.journaled_update(id, record.data(), journal)?;
            } else {
                pending.entry(parent).or_default().push(record);
                pending_count += 1;
            }
        }

        // Attach top-down so every parent exists before its children.
        let mut ready: Vec<Option<NodeId>> = pending
            .keys()
            .copied()
            .filter(|p| p.is_none_or(|p| self.contains(p)))
            .collect();
        ready.sort_unstable();
        let mut added = 0;
        while let Some(parent) = ready.pop() {
            let Some(mut batch) = pending.remove(&parent) else {
                continue;
            };
            batch.sort_unstable_by_key(|r| r.id);
            for record in batch {
                let id = record.node_id();
                self.journaled_insert(parent, id, record.data(), journal)?;
                added += 1;
                if pending.contains_key(&Some(id)) {
                    ready.push(Some(id));
                }
            }
        }

        if added < pending_count {
            // Whatever is left hangs off a parent that never showed up.
            let mut orphans: Vec<_> = pending.values().flatten().copied().collect();
            orphans.sort_unstable_by_key(|r| r.id);
            if let Some(orphan) = orphans.first() {
                let parent = orphan.parent()?.unwrap_or_else(|| orphan.node_id());
                return Err(TreeError::MissingParent {
                    node: orphan.node_id(),
                    parent,
                });
            }
        }

        self.check_numbering_around(&journal.touched())?;
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Visibility;

    const NOOPT8: &str = include_str!("../../testdata/noopt8.json");

    fn noopt8() -> TreeSnapshot {
        serde_json::from_str(NOOPT8).unwrap()
    }

    fn record(id: u32, parent_id: i64, child_count: u32, desc_count: u32) -> NodeRecord {
        NodeRecord {
            id,
            parent_id,
            label: format!("n{id}"),
            child_count,
            desc_count,
            ..Default::default()
        }
    }

    #[test]
    fn parses_backend_json() {
        let snap = noopt8();
        assert_eq!(snap.nodes.len(), 12);
        assert_eq!(snap.nodes[2].label, "setA_Occurrence_00001 = 0");
        assert_eq!(snap.nodes[0].parent_id, ROOT_PARENT_ID);
        assert!(snap.solution_ancestors().contains(&NodeId::new(32)));
        assert_eq!(snap.solution_ancestors().len(), 9);
    }

    #[test]
    fn builds_fixture_tree() {
        let tree = SearchTree::from_snapshot(&noopt8()).unwrap();
        assert_eq!(tree.len(), 12);
        assert_eq!(tree.root(), Some(NodeId::new(0)));
        let two = tree.get(NodeId::new(2)).unwrap();
        assert_eq!(
            two.visible_children(),
            &[NodeId::new(3), NodeId::new(16)],
            "left branch (lower id) first"
        );
        // 17 has two children in the full tree, none fetched.
        let seventeen = tree.get(NodeId::new(17)).unwrap();
        assert_eq!(seventeen.visibility(), &Visibility::Unrevealed);
        assert!(seventeen.has_more_children());
        assert!(tree.get(NodeId::new(32)).unwrap().data().is_solution);
    }

    #[test]
    fn record_order_does_not_matter() {
        let mut snap = noopt8();
        let forward = SearchTree::from_snapshot(&snap).unwrap();
        snap.nodes.reverse();
        let backward = SearchTree::from_snapshot(&snap).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn incremental_reveal_refreshes_and_appends() {
        let mut tree = SearchTree::from_snapshot(&TreeSnapshot {
            nodes: vec![record(0, -1, 2, 4)],
            sol_ancestor_ids: vec![],
        })
        .unwrap();
        let added = tree
            .apply_snapshot(&TreeSnapshot {
                nodes: vec![
                    record(0, -1, 2, 4),
                    record(2, 1, 0, 0),
                    record(1, 0, 2, 2),
                ],
                sol_ancestor_ids: vec![],
            })
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(
            tree.visible_preorder(),
            vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]
        );

        let mut refreshed = record(1, 0, 2, 3);
        refreshed.label = "x = 1".into();
        let added = tree
            .apply_snapshot(&TreeSnapshot {
                nodes: vec![refreshed],
                sol_ancestor_ids: vec![],
            })
            .unwrap();
        assert_eq!(added, 0);
        assert_eq!(tree.get(NodeId::new(1)).unwrap().data().label, "x = 1");
    }

    #[test]
    fn rejects_and_leaves_tree_untouched() {
        let mut tree = SearchTree::from_snapshot(&TreeSnapshot {
            nodes: vec![record(0, -1, 2, 4), record(1, 0, 0, 0)],
            sol_ancestor_ids: vec![],
        })
        .unwrap();
        let before = tree.clone();

        let orphan = TreeSnapshot {
            nodes: vec![record(3, 2, 0, 0)],
            sol_ancestor_ids: vec![],
        };
        assert_eq!(
            tree.apply_snapshot(&orphan),
            Err(TreeError::MissingParent {
                node: NodeId::new(3),
                parent: NodeId::new(2)
            })
        );

        let dup = TreeSnapshot {
            nodes: vec![record(2, 0, 0, 0), record(2, 0, 0, 0)],
            sol_ancestor_ids: vec![],
        };
        assert_eq!(
            tree.apply_snapshot(&dup),
            Err(TreeError::DuplicateId(NodeId::new(2)))
        );

        let gap = TreeSnapshot {
            nodes: vec![record(9, 0, 0, 0)],
            sol_ancestor_ids: vec![],
        };
        assert_eq!(
            tree.apply_snapshot(&gap),
            Err(TreeError::NonContiguousIds {
                node: NodeId::new(0),
                descendant: NodeId::new(9)
            })
        );

        let bad_parent = TreeSnapshot {
            nodes: vec![record(2, -7, 0, 0)],
            sol_ancestor_ids: vec![],
        };
        assert_eq!(
            tree.apply_snapshot(&bad_parent),
            Err(TreeError::InvalidParentId {
                node: NodeId::new(2),
                parent_id: -7
            })
        );
        assert_eq!(tree, before);
    }

    #[test]
    fn late_failure_undoes_refreshes_and_inserts() {
        let mut tree = SearchTree::from_snapshot(&TreeSnapshot {
            nodes: vec![record(0, -1, 2, 4), record(1, 0, 0, 0)],
            sol_ancestor_ids: vec![],
        })
        .unwrap();
        let before = tree.clone();

        // 1 is refreshed and gains children; 9 then breaks the numbering.
        let batch = TreeSnapshot {
            nodes: vec![
                record(1, 0, 2, 2),
                record(2, 1, 0, 0),
                record(3, 1, 0, 0),
                record(9, 0, 0, 0),
            ],
            sol_ancestor_ids: vec![],
        };
        assert_eq!(
            tree.apply_snapshot(&batch),
            Err(TreeError::NonContiguousIds {
                node: NodeId::new(0),
                descendant: NodeId::new(9)
            })
        );
        assert_eq!(tree, before);
        assert_eq!(tree.get(NodeId::new(1)).unwrap().visibility(), &Visibility::Leaf);
        assert!(!tree.contains(NodeId::new(2)));
        assert_eq!(tree.get(NodeId::new(0)).unwrap().visible_children(), &[NodeId::new(1)]);

        // The index survived the rollback: later batches still land.
        let added = tree
            .apply_snapshot(&TreeSnapshot {
                nodes: vec![record(4, 0, 0, 0)],
                sol_ancestor_ids: vec![],
            })
            .unwrap();
        assert_eq!(added, 1);
        assert_eq!(
            tree.visible_preorder(),
            vec![NodeId::new(0), NodeId::new(1), NodeId::new(4)]
        );
    }

    #[test]
    fn rolled_back_root_can_be_replaced() {
        let mut tree = SearchTree::new();
        let bad = TreeSnapshot {
            nodes: vec![record(0, -1, 1, 1), record(5, 0, 0, 0)],
            sol_ancestor_ids: vec![],
        };
        assert!(tree.apply_snapshot(&bad).is_err());
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        let good = TreeSnapshot {
            nodes: vec![record(0, -1, 1, 1), record(1, 0, 0, 0)],
            sol_ancestor_ids: vec![],
        };
        assert_eq!(tree.apply_snapshot(&good), Ok(2));
    }

    #[test]
    fn error_messages_name_the_nodes() {
        let err = TreeError::MissingParent {
            node: NodeId::new(3),
            parent: NodeId::new(2),
        };
        assert_eq!(
            err.to_string(),
            "node #3 names parent #2, which is not in the tree"
        );
    }
}
