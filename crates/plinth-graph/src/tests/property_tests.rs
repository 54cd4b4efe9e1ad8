//! Property-based tests for plinth-graph using proptest.
//!
//! The graph must converge on the same shape whatever order targets and
//! dependency declarations arrive in.
//!
//! Run with: cargo test --features proptest --package plinth-graph property_tests

#![cfg(feature = "proptest")]

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::{BuildGraph, BuildLabel, BuildTarget};

const TARGETS: usize = 8;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Depend(usize, usize),
}

fn target_label(index: usize) -> BuildLabel {
    BuildLabel::new(format!("pkg{}", index % 3), format!("t{index}")).unwrap()
}

fn provided_label(index: usize) -> BuildLabel {
    BuildLabel::new(format!("pkg{}", index % 3), format!("t{index}_go")).unwrap()
}

/// Every target is added exactly once; edges only go from lower to higher
/// indices so the graph stays acyclic. Odd targets provide a `_go` variant.
fn scenario_strategy() -> impl Strategy<Value = (Vec<(usize, usize)>, Vec<u32>)> {
    let edges = prop::collection::vec((0..TARGETS, 0..TARGETS), 0..=20).prop_map(|pairs| {
        pairs
            .into_iter()
            .filter(|(from, to)| from < to)
            .collect::<Vec<_>>()
    });
    let shuffle = prop::collection::vec(any::<u32>(), TARGETS * 2 + 20);
    (edges, shuffle)
}

/// Order operations by the random keys while keeping each `Depend` after the
/// `Add` of its consumer, since a consumer must exist before it declares edges.
fn schedule(edges: &[(usize, usize)], keys: &[u32]) -> Vec<Op> {
    let mut ops: Vec<(u32, Op)> = (0..TARGETS)
        .map(|i| (keys[i], Op::Add(i)))
        .chain(edges.iter().enumerate().map(|(n, &(from, to))| {
            let key = keys[TARGETS + n].max(keys[from]);
            (key, Op::Depend(from, to))
        }))
        .collect();
    ops.sort_by_key(|(key, op)| (*key, matches!(op, Op::Depend(..))));
    ops.into_iter().map(|(_, op)| op).collect()
}

fn build_target(index: usize) -> BuildTarget {
    let mut builder = BuildTarget::builder(target_label(index)).requires("go");
    if index % 2 == 1 {
        builder = builder.provide("go", provided_label(index));
    }
    builder.build()
}

fn run(ops: &[Op]) -> BuildGraph {
    let graph = BuildGraph::new();
    for op in ops {
        match *op {
            Op::Add(i) => {
                graph.add_target(build_target(i)).unwrap();
                if i % 2 == 1 {
                    graph
                        .add_target(BuildTarget::builder(provided_label(i)).build())
                        .unwrap();
                }
            }
            Op::Depend(from, to) => {
                graph
                    .add_dependency(target_label(from), target_label(to))
                    .unwrap();
            }
        }
    }
    graph
}

fn shape(graph: &BuildGraph) -> BTreeMap<String, (Vec<String>, Vec<String>)> {
    graph
        .all_targets()
        .iter()
        .map(|t| {
            let mut deps: Vec<String> =
                t.dependencies().iter().map(|d| d.label.to_string()).collect();
            deps.sort();
            let mut rev: Vec<String> = graph
                .reverse_dependencies(t)
                .iter()
                .map(|d| d.label.to_string())
                .collect();
            rev.sort();
            (t.label.to_string(), (deps, rev))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: the final graph does not depend on arrival order.
    #[test]
    fn prop_resolution_is_order_independent((edges, keys) in scenario_strategy()) {
        let shuffled = run(&schedule(&edges, &keys));
        let ordered = run(&schedule(&edges, &vec![0; keys.len()]));

        prop_assert_eq!(shape(&shuffled), shape(&ordered));
        prop_assert!(shuffled.statistics().is_settled());
    }

    /// Property: every resolved edge matches `dependent_targets` and shows up in
    /// the reverse index exactly once.
    #[test]
    fn prop_resolved_edges_are_symmetric((edges, keys) in scenario_strategy()) {
        let graph = run(&schedule(&edges, &keys));

        for &(from, to) in &edges {
            let consumer = graph.target_or_die(&target_label(from)).unwrap();
            prop_assert!(graph.all_dependencies_resolved(&consumer));
            prop_assert_eq!(
                consumer.resolved_labels_for(&target_label(to)),
                graph.dependent_targets(&target_label(from), &target_label(to))
            );
            for dep in consumer.dependencies() {
                let count = graph
                    .reverse_dependencies(&dep)
                    .iter()
                    .filter(|t| t.label == consumer.label)
                    .count();
                prop_assert_eq!(count, 1);
            }
        }
    }
}
