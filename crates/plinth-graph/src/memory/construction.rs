//! Construction methods for BuildGraph.

use std::sync::Arc;

use super::graph::BuildGraph;
use crate::error::Result;
use crate::package::Package;
use crate::target::BuildTarget;

impl BuildGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct a graph from packages and their targets, then link every
    /// dependency the targets declared.
    ///
    /// Mostly useful for tests and tooling; parsers feed a shared graph
    /// incrementally instead.
    pub fn from_packages<I, T>(packages: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Package, T)>,
        T: IntoIterator<Item = BuildTarget>,
    {
        let graph = Self::new();
        let mut added = Vec::new();
        for (package, targets) in packages {
            let package = graph.add_package(package)?;
            for target in targets {
                let target = graph.add_target(target)?;
                package.add_target(Arc::clone(&target))?;
                added.push(target);
            }
        }
        for target in &added {
            for dep in target.declared_dependencies() {
                graph.add_dependency(target.label.clone(), dep)?;
            }
        }
        Ok(graph)
    }
}
