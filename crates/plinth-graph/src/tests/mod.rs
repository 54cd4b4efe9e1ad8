mod property_tests;

use std::sync::Arc;

use crate::{BuildGraph, BuildLabel, BuildTarget};

pub(crate) fn label(text: &str) -> BuildLabel {
    BuildLabel::parse(text).expect("valid label")
}

pub(crate) fn add(graph: &BuildGraph, text: &str) -> Arc<BuildTarget> {
    graph
        .add_target(BuildTarget::builder(label(text)).build())
        .expect("target should be added")
}

pub(crate) fn resolved(target: &BuildTarget) -> Vec<String> {
    let mut labels: Vec<String> = target
        .dependencies()
        .iter()
        .map(|t| t.label.to_string())
        .collect();
    labels.sort();
    labels
}

pub(crate) fn revdeps(graph: &BuildGraph, target: &BuildTarget) -> Vec<String> {
    let mut labels: Vec<String> = graph
        .reverse_dependencies(target)
        .iter()
        .map(|t| t.label.to_string())
        .collect();
    labels.sort();
    labels
}
