//! Build state of a target and the result holders the executor fills in.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Lifecycle of a target as seen by the executor.
///
/// The graph never moves a target between states itself; it only reads the state
/// when answering [`crate::BuildGraph::all_deps_built`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum TargetState {
    /// Known to the graph but not needed by this invocation.
    #[default]
    Inactive = 0,
    /// Needed, but only once its package has been parsed.
    Semiactive,
    /// Needed for the current build.
    Active,
    /// Waiting for its dependencies.
    Pending,
    Building,
    /// Stopped after a dependency failed.
    Stopped,
    Built,
    /// Outputs were retrieved from a cache.
    Cached,
    /// Rebuilt, but outputs matched the previous build.
    Unchanged,
    /// Outputs were reused without running the build command.
    Reused,
    BuildFailed,
    TestFailed,
}

impl TargetState {
    const ALL: [TargetState; 12] = [
        TargetState::Inactive,
        TargetState::Semiactive,
        TargetState::Active,
        TargetState::Pending,
        TargetState::Building,
        TargetState::Stopped,
        TargetState::Built,
        TargetState::Cached,
        TargetState::Unchanged,
        TargetState::Reused,
        TargetState::BuildFailed,
        TargetState::TestFailed,
    ];

    /// Whether outputs for the target are available to its consumers.
    pub fn is_built(self) -> bool {
        matches!(
            self,
            TargetState::Built | TargetState::Cached | TargetState::Unchanged | TargetState::Reused
        )
    }

    /// Whether the target ended in a failure state.
    pub fn is_failed(self) -> bool {
        matches!(self, TargetState::BuildFailed | TargetState::TestFailed)
    }

    fn from_u8(value: u8) -> Self {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .unwrap_or(TargetState::Inactive)
    }
}

/// Lock-free cell holding a [`TargetState`].
#[derive(Debug, Default)]
pub(crate) struct AtomicTargetState(AtomicU8);

impl AtomicTargetState {
    pub(crate) fn new(state: TargetState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    pub(crate) fn load(&self) -> TargetState {
        TargetState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn store(&self, state: TargetState) {
        self.0.store(state as u8, Ordering::Release);
    }

    pub(crate) fn compare_exchange(&self, current: TargetState, new: TargetState) -> bool {
        self.0
            .compare_exchange(current as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Results of running a target's tests.
///
/// Owned by the target but only written by the test runner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    pub num_tests: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    /// Number of attempts that failed before a later attempt passed.
    pub flakes: u32,
    pub duration: Duration,
    pub cached: bool,
    pub timed_out: bool,
    pub output: String,
}

impl TestResults {
    /// Whether every test that ran passed.
    pub fn succeeded(&self) -> bool {
        self.failed == 0 && !self.timed_out
    }
}
