// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Searchtree Node: the revealed part of a constraint solver's search tree.
//!
//! A solver backend explores a search tree far larger than anyone wants to
//! draw. It sends decision nodes a few at a time, and each node carries the
//! *true* size of what lies below it (`child_count`, `desc_count`) even when
//! none of that has been fetched. This crate holds what has been revealed so
//! far and tracks, per node, where its fetched children live.
//!
//! - [`SearchTree`]: arena keyed by backend [`NodeId`], with visibility
//!   transitions ([`SearchTree::expand`], [`SearchTree::collapse`],
//!   [`SearchTree::toggle`]) and sizing ([`SearchTree::radius`]).
//! - [`Visibility`]: `Leaf`, `Unrevealed`, `Expanded(children)` or
//!   `Collapsed(children)`. Children are never visible and hidden at once.
//! - [`TreeSnapshot`]: the backend's flat wire format, ingested with
//!   [`SearchTree::from_snapshot`] and [`SearchTree::apply_snapshot`].
//! - [`config`]: saved run configurations consumed by the solver forms.
//!
//! ## Id numbering
//!
//! Backends number nodes depth-first, so the descendants of `n` are exactly
//! `n + 1 ..= n + desc_count`. Renderers lean on this to decide whether a
//! subtree has been fully seen without walking it. Snapshot ingestion checks
//! the property on every materialized edge and rejects trees that break it.
//!
//! ## Minimal usage
//!
//! ```
//! use searchtree_node::{NodeData, NodeId, SearchTree, Visibility};
//!
//! let mut tree = SearchTree::new();
//! let root = NodeId::new(0);
//! tree.insert(None, root, NodeData { child_count: 2, desc_count: 2, ..Default::default() })?;
//! tree.insert(Some(root), NodeId::new(1), NodeData::default())?;
//! tree.insert(Some(root), NodeId::new(2), NodeData::default())?;
//!
//! tree.collapse(root);
//! assert_eq!(tree.visible_preorder(), vec![root]);
//! assert!(tree.has_more_children(root));
//!
//! tree.toggle(root);
//! assert!(matches!(tree.get(root).unwrap().visibility(), Visibility::Expanded(_)));
//! # Ok::<(), searchtree_node::TreeError>(())
//! ```
//!
//! ## Ingesting backend JSON
//!
//! ```
//! use searchtree_node::{SearchTree, TreeSnapshot};
//!
//! let json = r#"{
//!   "nodes": [
//!     { "id": 0, "parentId": -1, "label": "", "prettyLabel": "", "childCount": 1,
//!       "isSolution": false, "isLeftChild": true, "descCount": 1 },
//!     { "id": 1, "parentId": 0, "label": "x = 1", "prettyLabel": "x = 1", "childCount": 0,
//!       "isSolution": true, "isLeftChild": true, "descCount": 0 }
//!   ],
//!   "solAncestorIds": [0, 1]
//! }"#;
//! let snapshot: TreeSnapshot = serde_json::from_str(json).unwrap();
//! let tree = SearchTree::from_snapshot(&snapshot).unwrap();
//! assert_eq!(tree.len(), 2);
//! ```

pub mod config;
mod error;
mod snapshot;
mod tree;
mod types;

pub use error::TreeError;
pub use snapshot::{NodeRecord, ROOT_PARENT_ID, TreeSnapshot};
pub use tree::{NodeRef, SearchTree};
pub use types::{
    Children, DESC_LABEL_PADDING, MIN_RADIUS, NodeData, NodeId, Visibility, calculate_radius,
};
