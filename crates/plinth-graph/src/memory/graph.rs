//! Core BuildGraph structure and inner state.

use std::sync::Arc;

use dashmap::DashMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap};

use crate::label::BuildLabel;
use crate::package::Package;
use crate::target::BuildTarget;

/// In-memory build graph shared by every parsing worker.
///
/// Cloning is cheap: clones share the same underlying registries. Single-key
/// lookups go straight to the striped maps; anything that has to touch the
/// pending waiters together with the registries runs under the coordination lock.
#[derive(Debug, Clone, Default)]
pub struct BuildGraph {
    pub(super) inner: Arc<GraphInner>,
}

#[derive(Debug, Default)]
pub(super) struct GraphInner {
    /// All targets indexed by label
    pub targets: DashMap<BuildLabel, Arc<BuildTarget>, FxBuildHasher>,
    /// All packages indexed by name
    pub packages: DashMap<String, Arc<Package>, FxBuildHasher>,
    /// Resolved label -> targets holding an edge onto it, in link order
    pub rev_deps: DashMap<BuildLabel, IndexMap<BuildLabel, Arc<BuildTarget>>, FxBuildHasher>,
    /// Coordination lock. It owns the waiters for labels that are not registered yet.
    pub pending: RwLock<PendingRevDeps>,
}

/// Waiters keyed by the label they are waiting for.
pub(super) type PendingRevDeps = HashMap<BuildLabel, IndexMap<WaiterKey, PendingWaiter>>;

/// One consumer may wait on the same label through several origins, so the origin
/// is part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) struct WaiterKey {
    pub from: BuildLabel,
    pub origin: Option<BuildLabel>,
}

#[derive(Debug, Clone)]
pub(super) struct PendingWaiter {
    pub from: Arc<BuildTarget>,
    /// The target whose provide table produced the awaited label. `None` when
    /// `from` named the awaited label directly.
    pub origin: Option<Arc<BuildTarget>>,
}
