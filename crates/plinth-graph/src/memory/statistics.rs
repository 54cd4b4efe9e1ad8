//! Statistics methods for BuildGraph.

use serde::{Deserialize, Serialize};

use super::graph::BuildGraph;

/// Point-in-time counters describing a graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub target_count: usize,
    pub package_count: usize,
    /// Distinct `(declared, resolved)` edges across all targets.
    pub resolved_edge_count: usize,
    /// Labels that still have waiters.
    pub pending_label_count: usize,
    pub pending_waiter_count: usize,
}

impl GraphStatistics {
    /// Whether nothing is waiting on an unregistered label.
    pub fn is_settled(&self) -> bool {
        self.pending_label_count == 0
    }
}

impl BuildGraph {
    /// Compute a statistics snapshot.
    pub fn statistics(&self) -> GraphStatistics {
        let (pending_label_count, pending_waiter_count) = {
            let pending = self.inner.pending.read();
            (pending.len(), pending.values().map(|w| w.len()).sum())
        };
        let resolved_edge_count = self
            .inner
            .targets
            .iter()
            .map(|entry| entry.value().resolved_edge_count())
            .sum();

        GraphStatistics {
            target_count: self.len(),
            package_count: self.inner.packages.len(),
            resolved_edge_count,
            pending_label_count,
            pending_waiter_count,
        }
    }
}
