// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing container: redraw guard, viewport, hit testing, callbacks.

use core::time::Duration;

use kurbo::{Circle, Point, Shape, Size};
use log::debug;
use searchtree_layout::{SizeScale, TreeLayout};
use searchtree_node::{NodeId, SearchTree};

use crate::render::{RenderInputs, RenderPass, TreeRenderer};
use crate::viewport::{Viewport, ViewportTransition};

/// The inputs a redraw decision looks at.
#[derive(Clone, Debug, PartialEq)]
pub struct PassKey {
    /// Selected node.
    pub selected: Option<NodeId>,
    /// Deep copy of the tree as of the pass.
    pub tree: SearchTree,
    /// Label visibility.
    pub show_labels: bool,
}

impl PassKey {
    /// Capture the key of a set of render inputs.
    pub fn of(inputs: &RenderInputs<'_>) -> Self {
        Self {
            selected: inputs.selected,
            tree: inputs.tree.clone(),
            show_labels: inputs.settings.show_labels,
        }
    }
}

/// Whether moving from `prev` to `next` needs a new pass.
///
/// True if the selection changed, the tree is not deeply equal (structure,
/// data, or visibility), or labels were toggled.
pub fn needs_redraw(prev: &PassKey, next: &PassKey) -> bool {
    prev.selected != next.selected
        || prev.show_labels != next.show_labels
        || prev.tree != next.tree
}

type ClickHandler = Box<dyn FnMut(NodeId)>;
type PositionsHandler = Box<dyn FnMut(&[(NodeId, Point)])>;

/// A mounted tree visualization.
///
/// Owns the renderer (and with it the position history), the viewport, and
/// the hit targets of the last pass. Passes run on the caller's thread; the
/// container never blocks on an animation.
pub struct TreeVis<L, S> {
    renderer: TreeRenderer<L, S>,
    viewport: Viewport,
    last_key: Option<PassKey>,
    hit_targets: Vec<(NodeId, Circle)>,
    focus: Option<ViewportTransition>,
    on_click: Option<ClickHandler>,
    on_positions: Option<PositionsHandler>,
}

impl<L, S> core::fmt::Debug for TreeVis<L, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeVis")
            .field("renderer", &self.renderer)
            .field("viewport", &self.viewport)
            .field("mounted", &self.last_key.is_some())
            .field("hit_targets", &self.hit_targets.len())
            .field("focus", &self.focus)
            .finish_non_exhaustive()
    }
}

impl<L: TreeLayout, S: SizeScale> TreeVis<L, S> {
    /// Create an unmounted container over a screen area of `extent`.
    pub fn new(layout: L, scale: S, extent: Size) -> Self {
        Self {
            renderer: TreeRenderer::new(layout, scale),
            viewport: Viewport::new(extent),
            last_key: None,
            hit_targets: Vec::new(),
            focus: None,
            on_click: None,
            on_positions: None,
        }
    }

    /// Called with the node id whenever a click lands on a node.
    pub fn on_node_click(&mut self, handler: impl FnMut(NodeId) + 'static) {
        self.on_click = Some(Box::new(handler));
    }

    /// Called after every pass with the laid-out positions, in pre-order.
    pub fn on_positions(&mut self, handler: impl FnMut(&[(NodeId, Point)]) + 'static) {
        self.on_positions = Some(Box::new(handler));
    }

    /// First paint.
    ///
    /// Runs two passes back to back so the second sees a populated history.
    /// Returns the second pass.
    pub fn mount(&mut self, inputs: &RenderInputs<'_>) -> RenderPass {
        let _ = self.renderer.render(inputs);
        let pass = self.renderer.render(inputs);
        debug!("mounted with {} nodes", pass.nodes.len());
        self.finish(PassKey::of(inputs), &pass);
        pass
    }

    /// Redraw if the inputs changed since the last pass.
    ///
    /// Mounts on first use.
    pub fn update(&mut self, inputs: &RenderInputs<'_>) -> Option<RenderPass> {
        if self.last_key.is_none() {
            return Some(self.mount(inputs));
        }
        let key = PassKey::of(inputs);
        if self
            .last_key
            .as_ref()
            .is_some_and(|prev| !needs_redraw(prev, &key))
        {
            return None;
        }
        let pass = self.renderer.render(inputs);
        self.finish(key, &pass);
        Some(pass)
    }

    fn finish(&mut self, key: PassKey, pass: &RenderPass) {
        self.hit_targets = pass
            .nodes
            .iter()
            .map(|n| (n.id, Circle::new(n.to, n.radius)))
            .collect();
        if let Some(focus) = pass.focus {
            self.focus = Some(self.viewport.focus_on(focus.point, focus.duration));
        }
        if let Some(handler) = &mut self.on_positions {
            handler(&pass.positions());
        }
        self.last_key = Some(key);
    }
}

impl<L, S> TreeVis<L, S> {
    /// Hit-test a screen point against the last pass and dispatch the click.
    ///
    /// Later-drawn nodes win over earlier ones where circles overlap.
    pub fn click(&mut self, screen: Point) -> Option<NodeId> {
        let p = self.viewport.screen_to_layout(screen);
        let (hit, _) = *self.hit_targets.iter().rev().find(|(_, c)| c.contains(p))?;
        if let Some(handler) = &mut self.on_click {
            handler(hit);
        }
        Some(hit)
    }

    /// Advance the focus animation to `elapsed` since it started.
    ///
    /// Finishes and clears it once `elapsed` reaches its duration.
    pub fn tick(&mut self, elapsed: Duration) {
        let Some(focus) = self.focus else {
            return;
        };
        self.viewport.set_transform(focus.at(elapsed));
        if elapsed >= focus.duration {
            self.focus = None;
        }
    }

    /// Focus animation still pending, if any.
    pub fn focus(&self) -> Option<&ViewportTransition> {
        self.focus.as_ref()
    }

    /// Current viewport.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Mutable viewport, for host pan and zoom gestures.
    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Owned copy of the position history, ordered by id.
    pub fn history_snapshot(&self) -> Vec<(NodeId, Point)> {
        self.renderer.history_snapshot()
    }
}
