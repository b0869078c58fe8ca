// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Load a recorded solver snapshot, mount it, then collapse and re-expand a
//! branch and print what each pass animates.

use hashbrown::HashSet;
use kurbo::{Point, Size};
use searchtree_layout::{LinearScale, TidyLayout};
use searchtree_node::{NodeId, SearchTree, TreeSnapshot};
use searchtree_vis::{NodeClass, RenderInputs, RenderPass, RenderSettings, TreeVis};

fn summarize(title: &str, pass: &RenderPass) {
    println!("== {title}");
    for n in &pass.nodes {
        println!(
            "  {} {:?} {:?} -> ({:.1}, {:.1}) r={:.1} {:?} {}",
            n.id, n.phase, n.from, n.to.x, n.to.y, n.radius, n.class, n.badge
        );
    }
    for e in &pass.exiting {
        println!("  {} exits into ({:.1}, {:.1})", e.id, e.to.x, e.to.y);
    }
    if let Some(focus) = pass.focus {
        println!("  focus {} at ({:.1}, {:.1})", focus.node, focus.point.x, focus.point.y);
    }
}

fn inputs<'a>(tree: &'a SearchTree, solution: &'a HashSet<NodeId>) -> RenderInputs<'a> {
    RenderInputs {
        tree,
        selected: Some(SELECTED),
        solution_ancestors: solution,
        solvable: true,
        diff_parent: Some(NodeId::new(31)),
        settings: RenderSettings::default(),
    }
}

const SELECTED: NodeId = NodeId::new(16);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let snapshot: TreeSnapshot =
        serde_json::from_str(include_str!("../../testdata/noopt8.json"))?;
    let mut tree = SearchTree::from_snapshot(&snapshot)?;
    let solution = snapshot.solution_ancestors();

    let mut vis = TreeVis::new(
        TidyLayout::default(),
        LinearScale::default(),
        Size::new(1200.0, 800.0),
    );
    vis.on_node_click(|id| println!("  clicked {id}"));
    vis.on_positions(|p| println!("  stored {} positions", p.len()));

    let pass = vis.mount(&inputs(&tree, &solution));
    summarize("mount", &pass);
    let red = pass
        .nodes
        .iter()
        .filter(|n| n.class.contains(NodeClass::RED))
        .count();
    println!("  {red} nodes off the solution path");

    tree.collapse(SELECTED);
    if let Some(pass) = vis.update(&inputs(&tree, &solution)) {
        summarize("collapse #16", &pass);
    }

    tree.expand(SELECTED);
    if let Some(pass) = vis.update(&inputs(&tree, &solution)) {
        summarize("expand #16", &pass);
    }

    if vis.update(&inputs(&tree, &solution)).is_none() {
        println!("== unchanged: no pass");
    }

    vis.tick(RenderSettings::default().duration);
    let centre = vis.viewport().layout_to_screen(Point::ZERO);
    println!("== root now drawn at ({:.1}, {:.1})", centre.x, centre.y);
    let screen = vis
        .history_snapshot()
        .iter()
        .find(|(id, _)| *id == SELECTED)
        .map(|&(_, p)| vis.viewport().layout_to_screen(p));
    if let Some(screen) = screen {
        vis.click(screen);
    }
    Ok(())
}
