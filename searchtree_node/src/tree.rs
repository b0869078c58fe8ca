// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, visibility transitions, queries.

use hashbrown::HashMap;
use smallvec::smallvec;

use crate::error::TreeError;
use crate::types::{DESC_LABEL_PADDING, NodeData, NodeId, Visibility, calculate_radius};

/// Search tree revealed so far, keyed by backend id.
#[derive(Clone, Default)]
pub struct SearchTree {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    root: Option<NodeId>,
}

impl core::fmt::Debug for SearchTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let expanded = self
            .nodes
            .iter()
            .filter(|n| matches!(n.visibility, Visibility::Expanded(_)))
            .count();
        let collapsed = self
            .nodes
            .iter()
            .filter(|n| matches!(n.visibility, Visibility::Collapsed(_)))
            .count();
        f.debug_struct("SearchTree")
            .field("root", &self.root)
            .field("nodes", &self.nodes.len())
            .field("expanded", &expanded)
            .field("collapsed", &collapsed)
            .finish_non_exhaustive()
    }
}

/// Two trees are equal when they hold the same ids with the same data,
/// parents, and visibility, regardless of insertion order.
impl PartialEq for SearchTree {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .all(|n| other.node(n.id).is_some_and(|o| o == n))
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Node {
    id: NodeId,
    parent: Option<NodeId>,
    data: NodeData,
    visibility: Visibility,
}

impl SearchTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of materialized nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been revealed yet.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Whether `id` is materialized.
    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Borrow a node.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.node(id).map(|node| NodeRef { node })
    }

    /// Iterate all materialized nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.nodes.iter().map(|node| NodeRef { node })
    }

    /// Insert a node under `parent` (or as the root if `None`).
    ///
    /// The node starts [`Unrevealed`](Visibility::Unrevealed) or
    /// [`Leaf`](Visibility::Leaf). It joins whichever set currently holds its
    /// siblings: visible if the parent is expanded or unrevealed, hidden if the
    /// parent is collapsed. Siblings are kept ordered by id.
    pub fn insert(
        &mut self,
        parent: Option<NodeId>,
        id: NodeId,
        data: NodeData,
    ) -> Result<(), TreeError> {
        if self.contains(id) {
            return Err(TreeError::DuplicateId(id));
        }
        match parent {
            None => {
                if let Some(existing) = self.root {
                    return Err(TreeError::MultipleRoots { existing, new: id });
                }
                self.root = Some(id);
            }
            Some(p) => {
                let parent_node = self
                    .node_mut(p)
                    .ok_or(TreeError::MissingParent { node: id, parent: p })?;
                attach_child(parent_node, id)?;
            }
        }
        let visibility = Visibility::empty(data.child_count);
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node {
            id,
            parent,
            data,
            visibility,
        });
        Ok(())
    }

    /// Replace a node's data, keeping its place in the tree.
    ///
    /// Fails if the new `child_count` is smaller than the number of children
    /// already materialized. Unknown ids are ignored.
    pub fn update_data(&mut self, id: NodeId, data: NodeData) -> Result<(), TreeError> {
        let Some(node) = self.node_mut(id) else {
            return Ok(());
        };
        if (data.child_count as usize) < node.visibility.materialized().len() {
            return Err(TreeError::TooManyChildren {
                parent: id,
                child_count: data.child_count,
            });
        }
        if matches!(node.visibility, Visibility::Leaf | Visibility::Unrevealed) {
            node.visibility = Visibility::empty(data.child_count);
        }
        node.data = data;
        Ok(())
    }

    /// Deeply expand `id`: every hidden set in its subtree becomes visible.
    ///
    /// Idempotent. Unknown ids are ignored.
    pub fn expand(&mut self, id: NodeId) {
        self.for_each_in_subtree(id, |vis| {
            if let Visibility::Collapsed(c) = vis {
                *vis = Visibility::Expanded(core::mem::take(c));
            }
        });
    }

    /// Deeply collapse `id`: every visible set in its subtree becomes hidden.
    ///
    /// Idempotent. Unknown ids are ignored.
    pub fn collapse(&mut self, id: NodeId) {
        self.for_each_in_subtree(id, |vis| {
            if let Visibility::Expanded(c) = vis {
                *vis = Visibility::Collapsed(core::mem::take(c));
            }
        });
    }

    /// Flip `id` one level: hidden children are shown, visible children are
    /// hidden. Descendants keep their own state.
    ///
    /// No-op on leaves and unrevealed nodes.
    pub fn toggle(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.visibility = match core::mem::replace(&mut node.visibility, Visibility::Leaf) {
            Visibility::Collapsed(c) => Visibility::Expanded(c),
            Visibility::Expanded(c) => Visibility::Collapsed(c),
            other => other,
        };
    }

    /// Whether `id` has children that are not currently visible, either
    /// hidden or not yet fetched.
    pub fn has_more_children(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.has_more_children())
    }

    /// Circle radius for `id`. See [`calculate_radius`].
    pub fn radius(&self, id: NodeId) -> Option<f64> {
        self.get(id).map(|n| n.radius())
    }

    /// Node ids reachable from the root through visible children, pre-order.
    pub fn visible_preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            stack.extend(node.visibility.visible().iter().rev().copied());
        }
        out
    }

    /// Check the depth-first numbering every materialized edge relies on.
    ///
    /// Each child `c` of `n` must satisfy `n < c` and
    /// `c + c.desc_count <= n + n.desc_count`. Applied to every edge this
    /// places all descendants of `n` in `n + 1 ..= n + n.desc_count`.
    pub fn check_numbering(&self) -> Result<(), TreeError> {
        for node in &self.nodes {
            for &child in node.visibility.materialized() {
                if let Some(c) = self.node(child) {
                    check_edge(node, c)?;
                }
            }
        }
        Ok(())
    }

    /// [`check_numbering`](Self::check_numbering) restricted to the edges
    /// touching `ids`: each one's edge to its parent and to its children.
    pub(crate) fn check_numbering_around(&self, ids: &[NodeId]) -> Result<(), TreeError> {
        for &id in ids {
            let Some(node) = self.node(id) else {
                continue;
            };
            if let Some(parent) = node.parent.and_then(|p| self.node(p)) {
                check_edge(parent, node)?;
            }
            for &child in node.visibility.materialized() {
                if let Some(c) = self.node(child) {
                    check_edge(node, c)?;
                }
            }
        }
        Ok(())
    }

    /// [`update_data`](Self::update_data), recording the prior state.
    pub(crate) fn journaled_update(
        &mut self,
        id: NodeId,
        data: NodeData,
        journal: &mut Journal,
    ) -> Result<(), TreeError> {
        let Some(node) = self.node(id) else {
            return Ok(());
        };
        let prior = (id, node.data.clone(), node.visibility.clone());
        self.update_data(id, data)?;
        journal.refreshed.push(prior);
        Ok(())
    }

    /// [`insert`](Self::insert), recording the new id.
    pub(crate) fn journaled_insert(
        &mut self,
        parent: Option<NodeId>,
        id: NodeId,
        data: NodeData,
        journal: &mut Journal,
    ) -> Result<(), TreeError> {
        self.insert(parent, id, data)?;
        journal.inserted.push(id);
        Ok(())
    }

    /// Undo everything `journal` recorded, newest insert first, then the
    /// data refreshes.
    pub(crate) fn rollback(&mut self, journal: Journal) {
        for id in journal.inserted.into_iter().rev() {
            let Some(i) = self.index.remove(&id) else {
                continue;
            };
            let node = self.nodes.swap_remove(i);
            if let Some(moved) = self.nodes.get(i) {
                self.index.insert(moved.id, i);
            }
            match node.parent {
                None => {
                    if self.root == Some(id) {
                        self.root = None;
                    }
                }
                Some(p) => {
                    if let Some(parent) = self.node_mut(p) {
                        detach_child(parent, id);
                    }
                }
            }
        }
        for (id, data, visibility) in journal.refreshed.into_iter().rev() {
            if let Some(node) = self.node_mut(id) {
                node.data = data;
                node.visibility = visibility;
            }
        }
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let i = *self.index.get(&id)?;
        Some(&mut self.nodes[i])
    }

    fn for_each_in_subtree(&mut self, id: NodeId, mut f: impl FnMut(&mut Visibility)) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node_mut(id) else {
                continue;
            };
            f(&mut node.visibility);
            stack.extend_from_slice(node.visibility.materialized());
        }
    }
}

/// Changes made by one ingestion batch, kept so the batch can be undone.
#[derive(Debug, Default)]
pub(crate) struct Journal {
    refreshed: Vec<(NodeId, NodeData, Visibility)>,
    inserted: Vec<NodeId>,
}

impl Journal {
    /// Every node the batch refreshed or inserted.
    pub(crate) fn touched(&self) -> Vec<NodeId> {
        self.refreshed
            .iter()
            .map(|(id, ..)| *id)
            .chain(self.inserted.iter().copied())
            .collect()
    }
}

fn check_edge(parent: &Node, child: &Node) -> Result<(), TreeError> {
    let lo = u64::from(parent.id.get());
    let hi = lo + u64::from(parent.data.desc_count);
    let c_lo = u64::from(child.id.get());
    let c_hi = c_lo + u64::from(child.data.desc_count);
    if c_lo <= lo || c_hi > hi {
        return Err(TreeError::NonContiguousIds {
            node: parent.id,
            descendant: child.id,
        });
    }
    Ok(())
}

fn detach_child(parent: &mut Node, child: NodeId) {
    let emptied = match &mut parent.visibility {
        Visibility::Expanded(c) | Visibility::Collapsed(c) => {
            c.retain(|x| *x != child);
            c.is_empty()
        }
        _ => false,
    };
    if emptied {
        parent.visibility = Visibility::empty(parent.data.child_count);
    }
}

fn attach_child(parent: &mut Node, child: NodeId) -> Result<(), TreeError> {
    if parent.visibility.materialized().len() >= parent.data.child_count as usize {
        return Err(TreeError::TooManyChildren {
            parent: parent.id,
            child_count: parent.data.child_count,
        });
    }
    if let Visibility::Expanded(c) | Visibility::Collapsed(c) = &mut parent.visibility {
        let at = c.partition_point(|&x| x < child);
        c.insert(at, child);
    } else {
        // Leaves declare zero children and were rejected above.
        parent.visibility = Visibility::Expanded(smallvec![child]);
    }
    Ok(())
}

/// Borrowed view of one node.
#[derive(Copy, Clone, Debug)]
pub struct NodeRef<'a> {
    node: &'a Node,
}

impl<'a> NodeRef<'a> {
    /// Backend id.
    pub fn id(self) -> NodeId {
        self.node.id
    }

    /// Parent id (`None` for the root).
    pub fn parent(self) -> Option<NodeId> {
        self.node.parent
    }

    /// Backend-supplied data.
    pub fn data(self) -> &'a NodeData {
        &self.node.data
    }

    /// Current visibility state.
    pub fn visibility(self) -> &'a Visibility {
        &self.node.visibility
    }

    /// Children currently rendered.
    pub fn visible_children(self) -> &'a [NodeId] {
        self.node.visibility.visible()
    }

    /// Children currently hidden.
    pub fn hidden_children(self) -> &'a [NodeId] {
        self.node.visibility.hidden()
    }

    /// Whether fewer children are visible than the node truly has.
    pub fn has_more_children(self) -> bool {
        self.visible_children().len() < self.node.data.child_count as usize
    }

    /// Circle radius. See [`calculate_radius`].
    pub fn radius(self) -> f64 {
        calculate_radius(
            self.node.data.child_count,
            self.node.data.desc_count,
            self.visible_children().len(),
        )
    }

    /// Offset of the descendant-count label below the node centre.
    pub fn desc_label_height(self) -> f64 {
        self.radius() + DESC_LABEL_PADDING
    }
}
