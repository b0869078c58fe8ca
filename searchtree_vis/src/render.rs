// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The diff engine: turn a tree into an animated, classified render pass.
//!
//! ## Passes
//!
//! Each call to [`TreeRenderer::render`] lays out the visible tree and
//! reconciles it, keyed by node id, against what the previous pass drew:
//!
//! - Entering nodes grow out of their parent's last known position.
//! - Updating nodes move from where they were drawn to where they now belong.
//! - Exiting nodes shrink into their parent's new position (or, if the parent
//!   is gone too, its last drawn one) and are then removed.
//!
//! Links are keyed by their target and follow the same pattern with
//! zero-length curves as the grow/shrink anchor.
//!
//! Transitions are fire-and-forget. A pass never waits for the previous
//! pass's animations; it only issues new targets, and the substrate is
//! expected to retarget whatever is in flight.
//!
//! After the pass is built, every laid-out position is merged into the
//! renderer's [`PositionHistory`].

use core::time::Duration;

use hashbrown::{HashMap, HashSet};
use kurbo::{CubicBez, Point};
use log::{debug, trace};
use searchtree_layout::{LayoutPass, SizeScale, TreeLayout, collapsed_link, node_size};
use searchtree_node::{NodeId, NodeRef, SearchTree};

use crate::classify::{Classifier, LinkClass, NodeClass};
use crate::history::PositionHistory;

/// Presentation settings for a pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Length of every transition in the pass.
    pub duration: Duration,
    /// Draw decision labels and descendant-count badges.
    pub show_labels: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            show_labels: true,
        }
    }
}

/// Inputs to one pass.
#[derive(Copy, Clone, Debug)]
pub struct RenderInputs<'a> {
    /// Tree to draw; only visible children are laid out.
    pub tree: &'a SearchTree,
    /// Selected node, focused by the viewport when present.
    pub selected: Option<NodeId>,
    /// Ids on the path from the root to a solution.
    pub solution_ancestors: &'a HashSet<NodeId>,
    /// Whether the problem has a solution at all.
    pub solvable: bool,
    /// Node whose next decision edge is highlighted as new.
    pub diff_parent: Option<NodeId>,
    /// Presentation settings.
    pub settings: RenderSettings,
}

/// Lifecycle phase of an element within a pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    /// New this pass.
    Enter,
    /// Drawn last pass and still present.
    Update,
    /// Drawn last pass and gone now; remove once the transition ends.
    Exit,
}

/// A node present in this pass.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeElement {
    /// Node id.
    pub id: NodeId,
    /// [`Phase::Enter`] or [`Phase::Update`].
    pub phase: Phase,
    /// Where the transition starts.
    ///
    /// `None` when entering with no known origin (the root, or a node whose
    /// parent has never been laid out); the substrate places it at the origin.
    pub from: Option<Point>,
    /// Where the transition ends.
    pub to: Point,
    /// Circle radius at the end of the transition.
    pub radius: f64,
    /// Decision label, empty when labels are hidden.
    pub label: String,
    /// Vertical offset of the decision label from the centre.
    pub label_offset: f64,
    /// Descendant-count badge, empty when there is nothing to report or
    /// labels are hidden.
    pub badge: String,
    /// Badge opacity. Empty badges are faded out, not removed.
    pub badge_opacity: f64,
    /// Vertical offset of the badge from the centre.
    pub badge_offset: f64,
    /// Visual classes.
    pub class: NodeClass,
}

/// A node drawn last pass that is gone now.
///
/// Its circle shrinks to zero radius and its text fades while it moves.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExitElement {
    /// Node id.
    pub id: NodeId,
    /// Where it was drawn.
    pub from: Point,
    /// Where it collapses to.
    pub to: Point,
}

/// A link in this pass, or one leaving.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinkElement {
    /// Parent id.
    pub source: NodeId,
    /// Child id; links are keyed by target.
    pub target: NodeId,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Curve at the start of the transition.
    pub from: CubicBez,
    /// Curve at the end of the transition.
    pub to: CubicBez,
    /// Stroke opacity at the start.
    pub from_opacity: f64,
    /// Stroke opacity at the end.
    pub to_opacity: f64,
    /// Visual classes.
    pub class: LinkClass,
}

/// Animated pan to the selected node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FocusAction {
    /// Selected node.
    pub node: NodeId,
    /// Its layout-space position.
    pub point: Point,
    /// Pan duration.
    pub duration: Duration,
}

/// Everything the substrate must animate for one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPass {
    /// Entering and updating nodes, pre-order.
    pub nodes: Vec<NodeElement>,
    /// Exiting nodes, ordered by id.
    pub exiting: Vec<ExitElement>,
    /// Entering and updating links in pre-order, then exiting links by target id.
    pub links: Vec<LinkElement>,
    /// Pan to the selection, if it was laid out.
    pub focus: Option<FocusAction>,
    /// Length of every transition in the pass.
    pub duration: Duration,
}

impl RenderPass {
    /// Look up a present node.
    pub fn node(&self, id: NodeId) -> Option<&NodeElement> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up the link ending at `target`.
    pub fn link_to(&self, target: NodeId) -> Option<&LinkElement> {
        self.links.iter().find(|l| l.target == target)
    }

    /// `(id, position)` for every present node, in pre-order.
    pub fn positions(&self) -> Vec<(NodeId, Point)> {
        self.nodes.iter().map(|n| (n.id, n.to)).collect()
    }
}

#[derive(Copy, Clone, Debug)]
struct DrawnNode {
    parent: Option<NodeId>,
    position: Point,
}

#[derive(Copy, Clone, Debug)]
struct DrawnLink {
    source: NodeId,
    source_position: Point,
    curve: CubicBez,
    class: LinkClass,
}

/// Stateful renderer: owns what was drawn last pass and the position history.
pub struct TreeRenderer<L, S> {
    layout: L,
    scale: S,
    history: PositionHistory,
    drawn: HashMap<NodeId, DrawnNode>,
    drawn_links: HashMap<NodeId, DrawnLink>,
}

impl<L, S> core::fmt::Debug for TreeRenderer<L, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TreeRenderer")
            .field("history", &self.history.len())
            .field("drawn", &self.drawn.len())
            .field("drawn_links", &self.drawn_links.len())
            .finish_non_exhaustive()
    }
}

impl<L, S> TreeRenderer<L, S> {
    /// Last known position of `id`, from any earlier pass.
    pub fn remembered(&self, id: NodeId) -> Option<Point> {
        self.history.get(id)
    }

    /// Owned copy of the position history, ordered by id.
    pub fn history_snapshot(&self) -> Vec<(NodeId, Point)> {
        self.history.snapshot()
    }
}

impl<L: TreeLayout, S: SizeScale> TreeRenderer<L, S> {
    /// Create a renderer with an empty history.
    pub fn new(layout: L, scale: S) -> Self {
        Self {
            layout,
            scale,
            history: PositionHistory::new(),
            drawn: HashMap::new(),
            drawn_links: HashMap::new(),
        }
    }

    /// Run one layout pass.
    pub fn render(&mut self, inputs: &RenderInputs<'_>) -> RenderPass {
        let RenderInputs { tree, settings, .. } = *inputs;
        let cell = node_size(tree, &self.scale, settings.show_labels);
        let layout = self.layout.layout(tree, cell);
        let classifier = Classifier {
            selected: inputs.selected,
            solution_ancestors: inputs.solution_ancestors,
            solvable: inputs.solvable,
            diff_parent: inputs.diff_parent,
            history: &self.history,
        };

        let mut pass = RenderPass {
            duration: settings.duration,
            ..RenderPass::default()
        };

        for placed in layout.nodes() {
            let Some(node) = tree.get(placed.id) else {
                continue;
            };
            let (phase, from) = match self.drawn.get(&placed.id) {
                Some(drawn) => (Phase::Update, Some(drawn.position)),
                None => {
                    let origin = placed.parent.and_then(|p| self.history.get(p));
                    if origin.is_none() && placed.parent.is_some() {
                        trace!("node {} enters with no parent history", placed.id);
                    }
                    (Phase::Enter, origin)
                }
            };
            pass.nodes.push(node_element(
                node,
                phase,
                from,
                placed.position,
                cell.height,
                &classifier,
                settings.show_labels,
            ));
        }

        pass.exiting = self.exiting_nodes(&layout);
        pass.links = self.links(&layout, &classifier);

        pass.focus = inputs.selected.and_then(|sel| match layout.position_of(sel) {
            Some(point) => Some(FocusAction {
                node: sel,
                point,
                duration: settings.duration,
            }),
            None => {
                trace!("selected node {sel} not laid out; skipping focus");
                None
            }
        });

        debug!(
            "layout pass: {} entering, {} updating, {} exiting",
            pass.nodes.iter().filter(|n| n.phase == Phase::Enter).count(),
            pass.nodes.iter().filter(|n| n.phase == Phase::Update).count(),
            pass.exiting.len(),
        );

        self.commit(&layout, &pass);
        pass
    }

    fn exiting_nodes(&self, layout: &LayoutPass) -> Vec<ExitElement> {
        let mut out: Vec<ExitElement> = self
            .drawn
            .iter()
            .filter(|(id, _)| layout.node(**id).is_none())
            .map(|(&id, drawn)| {
                let to = drawn
                    .parent
                    .and_then(|p| {
                        layout
                            .position_of(p)
                            .or_else(|| self.drawn.get(&p).map(|d| d.position))
                            .or_else(|| self.history.get(p))
                    })
                    .unwrap_or(drawn.position);
                ExitElement {
                    id,
                    from: drawn.position,
                    to,
                }
            })
            .collect();
        out.sort_unstable_by_key(|e| e.id);
        out
    }

    fn links(&self, layout: &LayoutPass, classifier: &Classifier<'_>) -> Vec<LinkElement> {
        let mut out = Vec::with_capacity(layout.links().len());
        for link in layout.links() {
            let class = classifier.classify_link(link.source, link.target);
            let element = match self.drawn_links.get(&link.target) {
                Some(drawn) => LinkElement {
                    source: link.source,
                    target: link.target,
                    phase: Phase::Update,
                    from: drawn.curve,
                    to: link.curve,
                    from_opacity: 1.0,
                    to_opacity: 1.0,
                    class,
                },
                None => {
                    let origin = self.history.get(link.source).unwrap_or(Point::ORIGIN);
                    LinkElement {
                        source: link.source,
                        target: link.target,
                        phase: Phase::Enter,
                        from: collapsed_link(origin),
                        to: link.curve,
                        from_opacity: 0.0,
                        to_opacity: 1.0,
                        class,
                    }
                }
            };
            out.push(element);
        }

        let mut leaving: Vec<_> = self
            .drawn_links
            .iter()
            .filter(|(target, _)| layout.node(**target).is_none())
            .map(|(&target, drawn)| {
                let anchor = layout
                    .position_of(drawn.source)
                    .unwrap_or(drawn.source_position);
                LinkElement {
                    source: drawn.source,
                    target,
                    phase: Phase::Exit,
                    from: drawn.curve,
                    to: collapsed_link(anchor),
                    from_opacity: 1.0,
                    to_opacity: 0.0,
                    class: drawn.class,
                }
            })
            .collect();
        leaving.sort_unstable_by_key(|l| l.target);
        out.extend(leaving);
        out
    }

    fn commit(&mut self, layout: &LayoutPass, pass: &RenderPass) {
        for placed in layout.nodes() {
            self.history.upsert(placed.id, placed.position);
        }
        self.drawn = layout
            .nodes()
            .iter()
            .map(|n| {
                (
                    n.id,
                    DrawnNode {
                        parent: n.parent,
                        position: n.position,
                    },
                )
            })
            .collect();
        self.drawn_links = pass
            .links
            .iter()
            .filter(|l| l.phase != Phase::Exit)
            .filter_map(|l| {
                let source_position = layout.position_of(l.source)?;
                Some((
                    l.target,
                    DrawnLink {
                        source: l.source,
                        source_position,
                        curve: l.to,
                        class: l.class,
                    },
                ))
            })
            .collect();
    }
}

fn node_element(
    node: NodeRef<'_>,
    phase: Phase,
    from: Option<Point>,
    to: Point,
    cell_height: f64,
    classifier: &Classifier<'_>,
    show_labels: bool,
) -> NodeElement {
    let class = classifier.classify_node(node);
    let radius = node.radius();
    let badge = if show_labels && class.contains(NodeClass::HAS_OTHERS) {
        format!("{} nodes below", node.data().desc_count)
    } else {
        String::new()
    };
    NodeElement {
        id: node.id(),
        phase,
        from,
        to,
        radius,
        label: if show_labels {
            node.data().label.clone()
        } else {
            String::new()
        },
        label_offset: -cell_height / 2.0,
        badge_opacity: if badge.is_empty() { 0.0 } else { 1.0 },
        badge,
        badge_offset: 2.0 * radius,
        class,
    }
}
