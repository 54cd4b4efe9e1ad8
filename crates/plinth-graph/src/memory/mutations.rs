//! Mutation methods for BuildGraph.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use tracing::{debug, error};

use super::graph::BuildGraph;
use crate::error::{GraphError, Result};
use crate::label::BuildLabel;
use crate::package::Package;
use crate::target::BuildTarget;

impl BuildGraph {
    /// Add a new target to the graph.
    ///
    /// Any dependencies that were declared on this label before it existed are
    /// linked before this returns, so no other worker can see the target
    /// registered while an earlier edge onto it is still unresolved.
    pub fn add_target(&self, target: impl Into<Arc<BuildTarget>>) -> Result<Arc<BuildTarget>> {
        let target = target.into();
        let mut pending = self.inner.pending.write();

        match self.inner.targets.entry(target.label.clone()) {
            Entry::Occupied(_) => {
                error!(label = %target.label, "duplicate target");
                return Err(GraphError::DuplicateTarget {
                    label: target.label.clone(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&target));
            }
        }
        debug!(label = %target.label, "added target");

        if let Some(waiters) = pending.remove(&target.label) {
            debug!(
                label = %target.label,
                waiters = waiters.len(),
                "draining pending reverse dependencies"
            );
            for waiter in waiters.into_values() {
                let to = waiter.origin.unwrap_or_else(|| Arc::clone(&target));
                self.link_dependencies(&mut pending, &waiter.from, &to);
            }
        }

        Ok(target)
    }

    /// Add a new package to the graph.
    pub fn add_package(&self, package: impl Into<Arc<Package>>) -> Result<Arc<Package>> {
        let package = package.into();
        match self.inner.packages.entry(package.name.clone()) {
            Entry::Occupied(_) => {
                error!(package = %package.name, "duplicate package");
                Err(GraphError::DuplicatePackage {
                    name: package.name.clone(),
                })
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&package));
                debug!(package = %package.name, "added package");
                Ok(package)
            }
        }
    }

    /// Declare that `from` depends on `to` and link the edge if possible.
    ///
    /// `from` must already be registered. `to` may not exist yet, in which case the
    /// edge is parked until [`BuildGraph::add_target`] registers it.
    pub fn add_dependency(&self, from: BuildLabel, to: BuildLabel) -> Result<()> {
        let from_target = self.target_or_die(&from)?;
        from_target.declare_dependency(to.clone());

        // We might have done this already; do a quick check here first.
        if from_target.has_resolved_dependency(&to) {
            return Ok(());
        }

        let mut pending = self.inner.pending.write();
        match self.target(&to) {
            Some(to_target) => self.link_dependencies(&mut pending, &from_target, &to_target),
            None => Self::add_pending_rev_dep(&mut pending, to, &from_target, None),
        }
        Ok(())
    }

    /// Add several dependencies declared by one target.
    pub fn add_dependencies<I>(&self, from: BuildLabel, targets: I) -> Result<()>
    where
        I: IntoIterator<Item = BuildLabel>,
    {
        for to in targets {
            self.add_dependency(from.clone(), to)?;
        }
        Ok(())
    }
}
