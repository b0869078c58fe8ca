// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Searchtree Layout: place the visible part of a search tree in 2D.
//!
//! The renderer treats layout as a capability behind the [`TreeLayout`]
//! trait: give it a [`SearchTree`](searchtree_node::SearchTree) and the cell
//! size of one node, get back a [`LayoutPass`] with a position per visible
//! node and a [`kurbo::CubicBez`] per visible edge. Layouts are stateless and
//! run over the whole visible tree every time.
//!
//! - [`TidyLayout`]: the default layered layout.
//! - [`SizeScale`] / [`LinearScale`]: injected descendant-count → size maps.
//! - [`node_size`]: the cell size for a tree, with or without labels.
//! - [`link_curve`] / [`collapsed_link`]: the link shape used everywhere.
//!
//! ## Minimal usage
//!
//! ```
//! use kurbo::Point;
//! use searchtree_layout::{LinearScale, TidyLayout, TreeLayout, node_size};
//! use searchtree_node::{NodeData, NodeId, SearchTree};
//!
//! let mut tree = SearchTree::new();
//! tree.insert(None, NodeId::new(0), NodeData { child_count: 2, desc_count: 2, ..Default::default() })?;
//! tree.insert(Some(NodeId::new(0)), NodeId::new(1), NodeData::default())?;
//! tree.insert(Some(NodeId::new(0)), NodeId::new(2), NodeData::default())?;
//!
//! let size = node_size(&tree, &LinearScale::default(), false);
//! let pass = TidyLayout::default().layout(&tree, size);
//! assert_eq!(pass.position_of(NodeId::new(0)), Some(Point::ZERO));
//! assert_eq!(pass.links().len(), 2);
//! # Ok::<(), searchtree_node::TreeError>(())
//! ```

mod pass;
mod scale;
mod tidy;

pub use pass::{
    LayoutPass, PositionedLink, PositionedNode, TreeLayout, collapsed_link, link_curve,
};
pub use scale::{LinearScale, SizeScale, node_size};
pub use tidy::TidyLayout;
