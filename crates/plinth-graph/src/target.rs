use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxHashSet as HashSet;
use serde::{Deserialize, Serialize};

use crate::label::BuildLabel;
use crate::state::{AtomicTargetState, TargetState, TestResults};

/// An input to a build rule: either a plain file in the package or another target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildInput {
    Label(BuildLabel),
    File(String),
}

impl BuildInput {
    /// The label this input refers to, if it is a target rather than a file.
    pub fn label(&self) -> Option<&BuildLabel> {
        match self {
            BuildInput::Label(label) => Some(label),
            BuildInput::File(_) => None,
        }
    }
}

impl fmt::Display for BuildInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildInput::Label(label) => label.fmt(f),
            BuildInput::File(path) => f.write_str(path),
        }
    }
}

impl From<BuildLabel> for BuildInput {
    fn from(label: BuildLabel) -> Self {
        BuildInput::Label(label)
    }
}

/// A single buildable unit: one node of the build graph.
///
/// Everything except the dependency table, the state and the test results is fixed
/// at construction time. Targets are shared as `Arc<BuildTarget>` between the graph,
/// the reverse dependency index and every target that depends on them.
pub struct BuildTarget {
    pub label: BuildLabel,
    pub outputs: Vec<String>,
    pub sources: Vec<BuildInput>,
    /// Source groups exposed to the build command under their own names.
    pub named_sources: IndexMap<String, Vec<BuildInput>>,
    pub tools: Vec<BuildInput>,
    pub data: Vec<BuildInput>,
    /// Context tags this target presents when it consumes other targets.
    pub requires: Vec<String>,
    pub is_test: bool,
    /// Labels offered in place of this target, keyed by the consumer's context tag.
    provides: IndexMap<String, Vec<BuildLabel>>,
    dependencies: Mutex<DependencyTable>,
    state: AtomicTargetState,
    test_results: Mutex<TestResults>,
}

/// Per-target dependency bookkeeping, keyed by the label as it was declared.
#[derive(Default)]
struct DependencyTable {
    entries: IndexMap<BuildLabel, DependencyInfo>,
}

#[derive(Default)]
struct DependencyInfo {
    /// What the declared label stands for once provides are applied; empty until
    /// the linker has looked at it.
    provided: Vec<BuildLabel>,
    resolved: IndexMap<BuildLabel, Arc<BuildTarget>>,
}

impl DependencyInfo {
    fn is_resolved(&self) -> bool {
        !self.provided.is_empty() && self.provided.iter().all(|l| self.resolved.contains_key(l))
    }
}

impl BuildTarget {
    /// Create a new target builder with sensible defaults.
    pub fn builder(label: BuildLabel) -> BuildTargetBuilder {
        BuildTargetBuilder {
            target: Self {
                label,
                outputs: Vec::new(),
                sources: Vec::new(),
                named_sources: IndexMap::new(),
                tools: Vec::new(),
                data: Vec::new(),
                requires: Vec::new(),
                is_test: false,
                provides: IndexMap::new(),
                dependencies: Mutex::new(DependencyTable::default()),
                state: AtomicTargetState::new(TargetState::Inactive),
                test_results: Mutex::new(TestResults::default()),
            },
        }
    }

    /// The provide table this target was constructed with.
    pub fn provides(&self) -> &IndexMap<String, Vec<BuildLabel>> {
        &self.provides
    }

    /// Labels that `consumer` should actually depend on when it names this target.
    ///
    /// Tools and data are never redirected. Without a matching context tag the result
    /// is this target's own label.
    pub fn provide_for(&self, consumer: &BuildTarget) -> Vec<BuildLabel> {
        if self.provides.is_empty() || consumer.requires.is_empty() {
            return vec![self.label.clone()];
        }
        if consumer.uses_as_tool_or_data(&self.label) {
            return vec![self.label.clone()];
        }

        let mut seen = HashSet::default();
        let provided: Vec<BuildLabel> = consumer
            .requires
            .iter()
            .filter_map(|tag| self.provides.get(tag))
            .flatten()
            .filter(|label| seen.insert(*label))
            .cloned()
            .collect();

        if provided.is_empty() {
            vec![self.label.clone()]
        } else {
            provided
        }
    }

    /// Whether `label` appears among this target's tools or data.
    pub fn uses_as_tool_or_data(&self, label: &BuildLabel) -> bool {
        self.tools
            .iter()
            .chain(self.data.iter())
            .any(|input| input.label() == Some(label))
    }

    /// Record that this target depends on `label`. Returns false if it already did.
    pub fn declare_dependency(&self, label: BuildLabel) -> bool {
        let mut table = self.dependencies.lock();
        if table.entries.contains_key(&label) {
            return false;
        }
        table.entries.insert(label, DependencyInfo::default());
        true
    }

    /// Declared dependency labels, in declaration order.
    pub fn declared_dependencies(&self) -> Vec<BuildLabel> {
        self.dependencies.lock().entries.keys().cloned().collect()
    }

    /// Whether the dependency declared as `label` has been fully linked.
    pub fn has_resolved_dependency(&self, label: &BuildLabel) -> bool {
        self.dependencies
            .lock()
            .entries
            .get(label)
            .is_some_and(DependencyInfo::is_resolved)
    }

    /// Labels the dependency declared as `label` has been resolved to so far.
    pub fn resolved_labels_for(&self, label: &BuildLabel) -> Vec<BuildLabel> {
        self.dependencies
            .lock()
            .entries
            .get(label)
            .map(|info| info.resolved.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All resolved dependency targets, deduplicated, in declaration order.
    pub fn dependencies(&self) -> Vec<Arc<BuildTarget>> {
        let table = self.dependencies.lock();
        let mut seen = HashSet::default();
        table
            .entries
            .values()
            .flat_map(|info| info.resolved.iter())
            .filter(|(label, _)| seen.insert(*label))
            .map(|(_, target)| Arc::clone(target))
            .collect()
    }

    /// Number of distinct `(declared, resolved)` edges on this target.
    pub fn resolved_edge_count(&self) -> usize {
        self.dependencies
            .lock()
            .entries
            .values()
            .map(|info| info.resolved.len())
            .sum()
    }

    pub fn state(&self) -> TargetState {
        self.state.load()
    }

    pub fn set_state(&self, state: TargetState) {
        self.state.store(state);
    }

    /// Move from `from` to `to` only if the target is currently in `from`.
    pub fn sync_update_state(&self, from: TargetState, to: TargetState) -> bool {
        self.state.compare_exchange(from, to)
    }

    pub fn test_results(&self) -> TestResults {
        self.test_results.lock().clone()
    }

    /// Update the test results in place.
    pub fn update_test_results<F>(&self, update: F)
    where
        F: FnOnce(&mut TestResults),
    {
        update(&mut self.test_results.lock());
    }

    pub(crate) fn all_dependencies_resolved(&self) -> bool {
        self.dependencies
            .lock()
            .entries
            .values()
            .all(DependencyInfo::is_resolved)
    }

    pub(crate) fn all_deps_built(&self) -> bool {
        self.dependencies
            .lock()
            .entries
            .values()
            .flat_map(|info| info.resolved.values())
            .all(|dep| dep.state().is_built())
    }

    /// Note what `declared` stands for after provides were applied.
    pub(crate) fn expect_dependency(&self, declared: &BuildLabel, provided: &[BuildLabel]) {
        let mut table = self.dependencies.lock();
        let info = table.entries.entry(declared.clone()).or_default();
        for label in provided {
            if !info.provided.contains(label) {
                info.provided.push(label.clone());
            }
        }
    }

    /// Resolve `declared` onto `target`. Returns false if the edge already existed.
    pub(crate) fn resolve_dependency(&self, declared: &BuildLabel, target: Arc<BuildTarget>) -> bool {
        let mut table = self.dependencies.lock();
        let info = table.entries.entry(declared.clone()).or_default();
        if info.resolved.contains_key(&target.label) {
            return false;
        }
        info.resolved.insert(target.label.clone(), target);
        true
    }
}

impl fmt::Debug for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildTarget")
            .field("label", &self.label)
            .field("outputs", &self.outputs)
            .field("requires", &self.requires)
            .field("provides", &self.provides)
            .field("dependencies", &*self.dependencies.lock())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for DependencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only labels: following the Arcs would print the whole subgraph.
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(label, info)| (label, info.resolved.keys().collect::<Vec<_>>())),
            )
            .finish()
    }
}

/// Builder for [`BuildTarget`].
#[derive(Debug)]
pub struct BuildTargetBuilder {
    target: BuildTarget,
}

impl BuildTargetBuilder {
    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.target.outputs.push(output.into());
        self
    }

    pub fn outputs<I, S>(mut self, outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target.outputs.extend(outputs.into_iter().map(Into::into));
        self
    }

    pub fn source(mut self, source: impl Into<BuildInput>) -> Self {
        self.target.sources.push(source.into());
        self
    }

    pub fn named_source(mut self, group: impl Into<String>, source: impl Into<BuildInput>) -> Self {
        self.target
            .named_sources
            .entry(group.into())
            .or_default()
            .push(source.into());
        self
    }

    pub fn tool(mut self, tool: impl Into<BuildInput>) -> Self {
        self.target.tools.push(tool.into());
        self
    }

    pub fn data(mut self, data: impl Into<BuildInput>) -> Self {
        self.target.data.push(data.into());
        self
    }

    /// Add a context tag this target requires from its dependencies.
    pub fn requires(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.target.requires.contains(&tag) {
            self.target.requires.push(tag);
        }
        self
    }

    /// Offer `label` instead of this target to consumers requiring `tag`.
    pub fn provide(mut self, tag: impl Into<String>, label: BuildLabel) -> Self {
        let labels = self.target.provides.entry(tag.into()).or_default();
        if !labels.contains(&label) {
            labels.push(label);
        }
        self
    }

    /// Declare a dependency. The graph links it once `add_dependency` is called.
    pub fn dependency(self, label: BuildLabel) -> Self {
        self.target.declare_dependency(label);
        self
    }

    pub fn test(mut self, is_test: bool) -> Self {
        self.target.is_test = is_test;
        self
    }

    pub fn build(self) -> BuildTarget {
        self.target
    }
}

impl From<String> for BuildInput {
    fn from(path: String) -> Self {
        BuildInput::File(path)
    }
}

impl From<&str> for BuildInput {
    fn from(path: &str) -> Self {
        BuildInput::File(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(text: &str) -> BuildLabel {
        BuildLabel::parse(text).unwrap()
    }

    #[test]
    fn provide_for_without_table_is_self() {
        let lib = BuildTarget::builder(label("//lib:lib")).build();
        let consumer = BuildTarget::builder(label("//app:app")).requires("go").build();
        assert_eq!(lib.provide_for(&consumer), vec![label("//lib:lib")]);
    }

    #[test]
    fn provide_for_selects_by_requires_in_order() {
        let proto = BuildTarget::builder(label("//proto:api"))
            .provide("py", label("//proto:api_py"))
            .provide("go", label("//proto:api_go"))
            .provide("go", label("//proto:api_go_grpc"))
            .build();
        let consumer = BuildTarget::builder(label("//app:app"))
            .requires("go")
            .requires("py")
            .build();
        assert_eq!(
            proto.provide_for(&consumer),
            vec![
                label("//proto:api_go"),
                label("//proto:api_go_grpc"),
                label("//proto:api_py"),
            ]
        );
    }

    #[test]
    fn provide_for_unmatched_context_is_self() {
        let proto = BuildTarget::builder(label("//proto:api"))
            .provide("go", label("//proto:api_go"))
            .build();
        let consumer = BuildTarget::builder(label("//app:app")).requires("java").build();
        assert_eq!(proto.provide_for(&consumer), vec![label("//proto:api")]);
    }

    #[test]
    fn tools_and_data_are_never_redirected() {
        let proto = BuildTarget::builder(label("//proto:api"))
            .provide("go", label("//proto:api_go"))
            .build();
        let as_tool = BuildTarget::builder(label("//app:gen"))
            .requires("go")
            .tool(label("//proto:api"))
            .build();
        let as_data = BuildTarget::builder(label("//app:test"))
            .requires("go")
            .data(label("//proto:api"))
            .build();
        assert_eq!(proto.provide_for(&as_tool), vec![label("//proto:api")]);
        assert_eq!(proto.provide_for(&as_data), vec![label("//proto:api")]);
    }

    #[test]
    fn resolving_is_idempotent() {
        let from = BuildTarget::builder(label("//a:a"))
            .dependency(label("//b:b"))
            .build();
        let to = Arc::new(BuildTarget::builder(label("//b:b")).build());

        from.expect_dependency(&to.label, &[to.label.clone()]);
        assert!(from.resolve_dependency(&to.label, Arc::clone(&to)));
        assert!(!from.resolve_dependency(&to.label, Arc::clone(&to)));
        assert_eq!(from.resolved_edge_count(), 1);
        assert!(from.has_resolved_dependency(&to.label));
        assert!(from.all_dependencies_resolved());
    }

    #[test]
    fn partially_provided_dependency_is_unresolved() {
        let from = BuildTarget::builder(label("//a:a"))
            .dependency(label("//p:p"))
            .build();
        let q = Arc::new(BuildTarget::builder(label("//p:q")).build());

        from.expect_dependency(&label("//p:p"), &[label("//p:q"), label("//p:r")]);
        from.resolve_dependency(&label("//p:p"), q);
        assert!(!from.has_resolved_dependency(&label("//p:p")));
        assert!(!from.all_dependencies_resolved());
        assert_eq!(from.resolved_labels_for(&label("//p:p")), vec![label("//p:q")]);
    }

    #[test]
    fn declared_dependencies_are_deduplicated() {
        let target = BuildTarget::builder(label("//a:a"))
            .dependency(label("//b:b"))
            .dependency(label("//c:c"))
            .build();
        assert!(!target.declare_dependency(label("//b:b")));
        assert!(target.declare_dependency(label("//d:d")));
        assert_eq!(
            target.declared_dependencies(),
            vec![label("//b:b"), label("//c:c"), label("//d:d")]
        );
    }

    #[test]
    fn deps_built_follows_dependency_state() {
        let from = BuildTarget::builder(label("//a:a")).build();
        let to = Arc::new(BuildTarget::builder(label("//b:b")).build());
        from.expect_dependency(&to.label, &[to.label.clone()]);
        from.resolve_dependency(&to.label, Arc::clone(&to));

        assert!(!from.all_deps_built());
        to.set_state(TargetState::Cached);
        assert!(from.all_deps_built());
    }

    #[test]
    fn new_target_starts_inactive() {
        let target = BuildTarget::builder(label("//a:a")).build();
        assert_eq!(target.state(), TargetState::Inactive);
        assert!(target.sync_update_state(TargetState::Inactive, TargetState::Active));
        assert_eq!(target.state(), TargetState::Active);
    }

    #[test]
    fn debug_output_does_not_follow_edges() {
        let from = BuildTarget::builder(label("//a:a")).build();
        let to = Arc::new(BuildTarget::builder(label("//b:b")).output("b.txt").build());
        let declared = to.label.clone();
        from.resolve_dependency(&declared, to);
        let rendered = format!("{from:?}");
        assert!(rendered.contains("//b:b"));
        assert!(!rendered.contains("b.txt"));
    }
}
