// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Last known layout position of every node ever drawn.

use hashbrown::HashMap;
use kurbo::Point;
use searchtree_node::NodeId;

/// Node id → last laid-out position.
///
/// Entries are created the first time a node is laid out and overwritten on
/// every later pass. They are never removed: a node that exits keeps its
/// entry so that it can grow back out of a sensible place when it re-enters.
/// The map is owned by the renderer; outside code only sees copies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionHistory {
    positions: HashMap<NodeId, Point>,
}

impl PositionHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known position of `id`.
    pub fn get(&self, id: NodeId) -> Option<Point> {
        self.positions.get(&id).copied()
    }

    /// Whether `id` has ever been laid out.
    pub fn contains(&self, id: NodeId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Record `id` at `position`, creating or overwriting its entry.
    pub fn upsert(&mut self, id: NodeId, position: Point) {
        self.positions.insert(id, position);
    }

    /// Whether every id in `id + 1 ..= id + count` has been laid out.
    ///
    /// Trivially true for `count == 0`; false if the range overflows.
    pub fn contains_range_after(&self, id: NodeId, count: u32) -> bool {
        (1..=count).all(|i| id.offset(i).is_some_and(|d| self.contains(d)))
    }

    /// Number of remembered nodes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing has been laid out yet.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Owned copy of every entry, ordered by id.
    pub fn snapshot(&self) -> Vec<(NodeId, Point)> {
        let mut out: Vec<_> = self.positions.iter().map(|(&id, &p)| (id, p)).collect();
        out.sort_unstable_by_key(|&(id, _)| id);
        out
    }
}
