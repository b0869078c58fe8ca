// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised while building or extending a [`SearchTree`](crate::SearchTree).

use crate::types::NodeId;

/// Reasons a node or snapshot was rejected.
///
/// Only ingestion fails. Rendering never does: missing references during a
/// layout pass fall back to stored positions instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id is already in the tree, or appears twice in one snapshot.
    #[error("node {0} appears more than once")]
    DuplicateId(NodeId),
    /// The parent id names no known node.
    #[error("node {node} names parent {parent}, which is not in the tree")]
    MissingParent {
        /// Rejected node.
        node: NodeId,
        /// Parent it asked for.
        parent: NodeId,
    },
    /// A second node claimed the root sentinel.
    #[error("node {new} claims to be a root but {existing} already is")]
    MultipleRoots {
        /// Current root.
        existing: NodeId,
        /// Rejected node.
        new: NodeId,
    },
    /// The parent id is negative but not the root sentinel, or does not fit an id.
    #[error("node {node} has invalid parent id {parent_id}")]
    InvalidParentId {
        /// Rejected node.
        node: NodeId,
        /// Raw parent id from the snapshot.
        parent_id: i64,
    },
    /// More children were materialized than the parent declares.
    #[error("node {parent} declares {child_count} children but more were supplied")]
    TooManyChildren {
        /// Parent whose declared count was exceeded.
        parent: NodeId,
        /// Declared child count.
        child_count: u32,
    },
    /// A descendant lies outside its ancestor's depth-first id block.
    ///
    /// Explored-subtree detection and diff highlighting both rely on
    /// descendants of `n` being numbered `n + 1 ..= n + desc_count`.
    #[error("node {descendant} lies outside the id block of its ancestor {node}")]
    NonContiguousIds {
        /// Ancestor whose block was violated.
        node: NodeId,
        /// Offending materialized child.
        descendant: NodeId,
    },
}
