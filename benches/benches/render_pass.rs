// Copyright 2025 the Searchtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use hashbrown::HashSet;
use kurbo::Size;
use searchtree_layout::{LinearScale, TidyLayout, TreeLayout, node_size};
use searchtree_node::{NodeId, NodeRecord, ROOT_PARENT_ID, SearchTree, TreeSnapshot};
use searchtree_vis::{RenderInputs, RenderSettings, TreeRenderer};

/// Full binary tree of `depth` levels, numbered depth-first.
fn gen_binary_snapshot(depth: u32) -> TreeSnapshot {
    fn walk(depth: u32, parent: i64, next: &mut u32, out: &mut Vec<NodeRecord>) -> u32 {
        let id = *next;
        *next += 1;
        let at = out.len();
        out.push(NodeRecord {
            id,
            parent_id: parent,
            label: format!("x{} = {}", depth, id % 2),
            pretty_label: String::new(),
            child_count: if depth > 1 { 2 } else { 0 },
            desc_count: 0,
            is_solution: false,
            is_left_child: id % 2 == 1,
        });
        let mut desc = 0;
        if depth > 1 {
            for _ in 0..2 {
                desc += 1 + walk(depth - 1, i64::from(id), next, out);
            }
        }
        out[at].desc_count = desc;
        desc
    }
    let mut nodes = Vec::new();
    walk(depth, ROOT_PARENT_ID, &mut 0, &mut nodes);
    TreeSnapshot {
        nodes,
        sol_ancestor_ids: vec![0],
    }
}

fn inputs<'a>(tree: &'a SearchTree, sol: &'a HashSet<NodeId>) -> RenderInputs<'a> {
    RenderInputs {
        tree,
        selected: Some(NodeId::new(0)),
        solution_ancestors: sol,
        solvable: true,
        diff_parent: None,
        settings: RenderSettings::default(),
    }
}

fn bench_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");
    for &depth in &[8_u32, 11] {
        let snap = gen_binary_snapshot(depth);
        group.throughput(Throughput::Elements(snap.nodes.len() as u64));
        group.bench_function(format!("from_snapshot_d{}", depth), |b| {
            b.iter(|| black_box(SearchTree::from_snapshot(&snap).map(|t| t.len())));
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for &depth in &[8_u32, 11] {
        let snap = gen_binary_snapshot(depth);
        let Ok(tree) = SearchTree::from_snapshot(&snap) else {
            continue;
        };
        let size = node_size(&tree, &LinearScale::default(), true);
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_function(format!("tidy_d{}", depth), |b| {
            b.iter(|| black_box(TidyLayout::default().layout(&tree, size).len()));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    for &depth in &[8_u32, 11] {
        let snap = gen_binary_snapshot(depth);
        let Ok(tree) = SearchTree::from_snapshot(&snap) else {
            continue;
        };
        let sol = snap.solution_ancestors();
        group.throughput(Throughput::Elements(tree.len() as u64));
        group.bench_function(format!("first_pass_d{}", depth), |b| {
            b.iter_batched(
                || TreeRenderer::new(TidyLayout::default(), LinearScale::default()),
                |mut r| black_box(r.render(&inputs(&tree, &sol)).nodes.len()),
                BatchSize::SmallInput,
            );
        });

        // Alternate between the full tree and one with the left branch
        // collapsed so every pass has entering and exiting nodes.
        let mut collapsed = tree.clone();
        collapsed.collapse(NodeId::new(1));
        let mut r = TreeRenderer::new(TidyLayout::default(), LinearScale::default());
        let _ = r.render(&inputs(&tree, &sol));
        let mut flip = false;
        group.bench_function(format!("toggle_pass_d{}", depth), |b| {
            b.iter(|| {
                flip = !flip;
                let t = if flip { &collapsed } else { &tree };
                black_box(r.render(&inputs(t, &sol)).exiting.len())
            });
        });
    }
    group.finish();
}

fn bench_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");
    let vp = searchtree_vis::Viewport::new(Size::new(1200.0, 800.0));
    let tr = vp.focus_on(kurbo::Point::new(350.0, 90.0), RenderSettings::default().duration);
    group.bench_function("transition_sample_60", |b| {
        b.iter(|| {
            for i in 0..60 {
                black_box(tr.sample(f64::from(i) / 59.0));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_ingest, bench_layout, bench_render, bench_viewport);
criterion_main!(benches);
