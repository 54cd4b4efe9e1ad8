//! Dependency linking with provide/require indirection.
//!
//! Everything here runs with the coordination lock held for writing; callers pass
//! the guarded waiter map in to prove it.

use std::sync::Arc;

use tracing::{debug, trace};

use super::graph::{BuildGraph, PendingRevDeps, PendingWaiter, WaiterKey};
use crate::label::BuildLabel;
use crate::target::BuildTarget;

impl BuildGraph {
    /// Link `from`'s dependency on `to`, following whatever `to` provides for `from`.
    ///
    /// Provided labels that are not registered yet are parked with `to` as their
    /// origin, so that when they appear the link is replayed against `to`'s provide
    /// table rather than against whatever got registered under the provided label.
    pub(super) fn link_dependencies(
        &self,
        pending: &mut PendingRevDeps,
        from: &Arc<BuildTarget>,
        to: &Arc<BuildTarget>,
    ) {
        let provided = to.provide_for(from);
        from.expect_dependency(&to.label, &provided);

        for label in provided {
            match self.target(&label) {
                Some(dep) => {
                    if from.resolve_dependency(&to.label, dep) {
                        trace!(from = %from.label, declared = %to.label, to = %label, "linked");
                        // A consumer reaching `label` through two declarations is listed once.
                        self.inner
                            .rev_deps
                            .entry(label)
                            .or_default()
                            .entry(from.label.clone())
                            .or_insert_with(|| Arc::clone(from));
                    }
                }
                None => Self::add_pending_rev_dep(pending, label, from, Some(to)),
            }
        }
    }

    /// Park `from`'s interest in the unregistered label `to`.
    pub(super) fn add_pending_rev_dep(
        pending: &mut PendingRevDeps,
        to: BuildLabel,
        from: &Arc<BuildTarget>,
        origin: Option<&Arc<BuildTarget>>,
    ) {
        let key = WaiterKey {
            from: from.label.clone(),
            origin: origin.map(|o| o.label.clone()),
        };
        debug!(
            from = %from.label,
            waiting_on = %to,
            origin = ?key.origin.as_ref().map(ToString::to_string),
            "dependency pending"
        );
        pending
            .entry(to)
            .or_default()
            .entry(key)
            .or_insert_with(|| PendingWaiter {
                from: Arc::clone(from),
                origin: origin.cloned(),
            });
    }
}
