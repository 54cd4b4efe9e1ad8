//! Query methods for BuildGraph.

use std::sync::Arc;

use rustc_hash::FxHashMap as HashMap;
use tracing::error;

use super::graph::BuildGraph;
use crate::error::{GraphError, Result};
use crate::label::BuildLabel;
use crate::package::Package;
use crate::target::BuildTarget;

impl BuildGraph {
    /// Retrieve a target by label, or `None` if it hasn't been added (yet).
    pub fn target(&self, label: &BuildLabel) -> Option<Arc<BuildTarget>> {
        self.inner
            .targets
            .get(label)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Retrieve a target that the caller knows must exist.
    pub fn target_or_die(&self, label: &BuildLabel) -> Result<Arc<BuildTarget>> {
        self.target(label).ok_or_else(|| {
            error!(label = %label, "target not found in build graph");
            GraphError::TargetNotFound {
                label: label.clone(),
            }
        })
    }

    /// Retrieve a package by name.
    pub fn package(&self, name: &str) -> Option<Arc<Package>> {
        self.inner
            .packages
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Retrieve a package that the caller knows must exist.
    pub fn package_or_die(&self, name: &str) -> Result<Arc<Package>> {
        self.package(name).ok_or_else(|| {
            error!(package = %name, "package not found in build graph");
            GraphError::PackageNotFound {
                name: name.to_string(),
            }
        })
    }

    /// Whether a target is registered under `label`.
    pub fn contains(&self, label: &BuildLabel) -> bool {
        self.inner.targets.contains_key(label)
    }

    /// Number of registered targets.
    pub fn len(&self) -> usize {
        self.inner.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.targets.is_empty()
    }

    /// Snapshot of every target, sorted by label.
    ///
    /// Safe to call while other workers are still adding targets; the result
    /// is a copy and does not observe later additions.
    pub fn all_targets(&self) -> Vec<Arc<BuildTarget>> {
        let mut targets: Vec<_> = self
            .inner
            .targets
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        targets.sort_by(|a, b| a.label.cmp(&b.label));
        targets
    }

    /// Snapshot of every package, sorted by name.
    pub fn all_packages(&self) -> Vec<Arc<Package>> {
        let mut packages: Vec<_> = self
            .inner
            .packages
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        packages.sort_by(|a, b| a.name.cmp(&b.name));
        packages
    }

    /// Local copy of the package map.
    pub fn package_map(&self) -> HashMap<String, Arc<Package>> {
        self.inner
            .packages
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }

    /// Targets holding a resolved dependency on `target`, in the order they were linked.
    pub fn reverse_dependencies(&self, target: &BuildTarget) -> Vec<Arc<BuildTarget>> {
        self.inner
            .rev_deps
            .get(&target.label)
            .map(|revdeps| revdeps.values().cloned().collect())
            .unwrap_or_default()
    }

    /// True if every resolved dependency of `target` has been built.
    pub fn all_deps_built(&self, target: &BuildTarget) -> bool {
        let _guard = self.inner.pending.read();
        target.all_deps_built()
    }

    /// True once every dependency `target` declared has been linked to real targets.
    pub fn all_dependencies_resolved(&self, target: &BuildTarget) -> bool {
        let _guard = self.inner.pending.read();
        target.all_dependencies_resolved()
    }

    /// Labels that `from` actually depends on when it declared a dependency on `to`.
    ///
    /// Normally just `to`, unless `to` provides something else for `from`. Falls back
    /// to `to` while either target is still unknown.
    pub fn dependent_targets(&self, from: &BuildLabel, to: &BuildLabel) -> Vec<BuildLabel> {
        match (self.target(from), self.target(to)) {
            (Some(from_target), Some(to_target)) => {
                let _guard = self.inner.pending.read();
                to_target.provide_for(&from_target)
            }
            _ => vec![to.clone()],
        }
    }

    /// Labels that other targets are still waiting on, sorted.
    pub fn pending_labels(&self) -> Vec<BuildLabel> {
        let pending = self.inner.pending.read();
        let mut labels: Vec<_> = pending.keys().cloned().collect();
        labels.sort();
        labels
    }

    /// Targets waiting on `label`, sorted and deduplicated.
    pub fn pending_waiters(&self, label: &BuildLabel) -> Vec<BuildLabel> {
        let pending = self.inner.pending.read();
        let mut waiters: Vec<_> = pending
            .get(label)
            .map(|waiters| waiters.keys().map(|key| key.from.clone()).collect())
            .unwrap_or_default();
        waiters.sort();
        waiters.dedup();
        waiters
    }
}
