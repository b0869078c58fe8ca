// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Searchtree Vis: incremental, animated drawing of a partially revealed
//! search tree.
//!
//! Every time the tree, the selection, or the label setting changes, the
//! visible hierarchy is laid out again and reconciled by node id against
//! what was drawn before. The result is a [`RenderPass`]: what enters, what
//! moves, what leaves, and where each of those transitions starts and ends.
//! Drawing it is left to the host's substrate.
//!
//! - [`TreeRenderer`]: the diff engine. Keeps a [`PositionHistory`] of the
//!   last position of every node ever drawn, so that collapsed subtrees grow
//!   back out of their parent and exits shrink into it.
//! - [`Classifier`]: per-node [`NodeClass`] and per-link [`LinkClass`] flags
//!   (selected, has hidden children, explored, off the solution path,
//!   solution, newest decision).
//! - [`TreeVis`]: the container. Skips passes when nothing changed
//!   ([`needs_redraw`]), pans the [`Viewport`] to the selection, hit-tests
//!   clicks, and forwards positions and clicks to host callbacks.
//!
//! ## Minimal usage
//!
//! ```
//! use hashbrown::HashSet;
//! use kurbo::Size;
//! use searchtree_layout::{LinearScale, TidyLayout};
//! use searchtree_node::{NodeData, NodeId, SearchTree};
//! use searchtree_vis::{NodeClass, Phase, RenderInputs, RenderSettings, TreeVis};
//!
//! let mut tree = SearchTree::new();
//! let root = NodeId::new(0);
//! tree.insert(None, root, NodeData { child_count: 2, desc_count: 2, ..Default::default() })?;
//! tree.insert(Some(root), NodeId::new(1), NodeData::default())?;
//! tree.insert(Some(root), NodeId::new(2), NodeData::default())?;
//! let solution: HashSet<NodeId> = [root].into_iter().collect();
//!
//! fn inputs<'a>(tree: &'a SearchTree, solution: &'a HashSet<NodeId>) -> RenderInputs<'a> {
//!     RenderInputs {
//!         tree,
//!         selected: Some(NodeId::new(0)),
//!         solution_ancestors: solution,
//!         solvable: true,
//!         diff_parent: None,
//!         settings: RenderSettings::default(),
//!     }
//! }
//!
//! let mut vis = TreeVis::new(TidyLayout::default(), LinearScale::default(), Size::new(800.0, 600.0));
//! let pass = vis.mount(&inputs(&tree, &solution));
//! assert_eq!(pass.nodes.len(), 3);
//! assert!(pass.node(root).unwrap().class.contains(NodeClass::SELECTED));
//!
//! // Nothing changed: no pass.
//! assert!(vis.update(&inputs(&tree, &solution)).is_none());
//!
//! tree.collapse(root);
//! let pass = vis.update(&inputs(&tree, &solution)).unwrap();
//! assert_eq!(pass.exiting.len(), 2);
//! assert!(pass.links.iter().all(|l| l.phase == Phase::Exit));
//! # Ok::<(), searchtree_node::TreeError>(())
//! ```

mod classify;
mod container;
mod history;
mod render;
mod viewport;

pub use classify::{Classifier, LinkClass, NodeClass};
pub use container::{PassKey, TreeVis, needs_redraw};
pub use history::PositionHistory;
pub use render::{
    ExitElement, FocusAction, LinkElement, NodeElement, Phase, RenderInputs, RenderPass,
    RenderSettings, TreeRenderer,
};
pub use viewport::{Viewport, ViewportTransition};
