//! Parallel loading of a manifest into a [`BuildGraph`].
//!
//! Each package is handled by one rayon worker, which registers the package,
//! then each of its targets in order followed by that target's dependency
//! edges. Edges pointing at targets some other worker has not reached yet wait
//! in the graph until those targets arrive.

use std::sync::Arc;
use std::time::Instant;

use plinth_graph::{BuildGraph, Package};
use rayon::prelude::*;
use tracing::{debug, debug_span, info};

use crate::error::Result;
use crate::manifest::{Manifest, PackageSpec};

/// Feed every package of `manifest` into a fresh graph using `jobs` workers
/// (rayon's default when `None`).
pub fn load_graph(manifest: &Manifest, jobs: Option<usize>) -> Result<BuildGraph> {
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("plinth-parse-{i}"));
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build()?;

    let graph = BuildGraph::new();
    let start = Instant::now();
    pool.install(|| {
        manifest
            .packages
            .par_iter()
            .try_for_each(|spec| load_package(&graph, spec))
    })?;

    info!(
        packages = manifest.packages.len(),
        targets = graph.len(),
        workers = pool.current_num_threads(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "manifest loaded"
    );
    Ok(graph)
}

fn load_package(graph: &BuildGraph, spec: &PackageSpec) -> Result<()> {
    let _span = debug_span!("package", name = %spec.name).entered();
    let package = graph.add_package(Package::new(spec.name.as_str()))?;

    for target_spec in &spec.targets {
        let target = graph.add_target(spec.build_target(target_spec)?)?;
        package.add_target(Arc::clone(&target))?;
        for dep in target.declared_dependencies() {
            graph.add_dependency(target.label.clone(), dep)?;
        }
    }
    debug!(targets = package.len(), "package loaded");
    Ok(())
}
