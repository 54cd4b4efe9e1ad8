//! # plinth-graph
//!
//! The build target graph at the heart of plinth.
//!
//! Parsing workers discover packages, targets and dependency edges concurrently
//! and in no particular order. `BuildGraph` accepts them as they arrive and links
//! edges into a DAG, parking edges whose destination has not been discovered yet
//! until that destination is added.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         BuildGraph                           │
//! │           (Arc-shared, cloned into every worker)             │
//! └──────┬──────────────┬───────────────┬──────────────┬─────────┘
//!        │              │               │              │
//!        ▼              ▼               ▼              ▼
//!  ┌───────────┐  ┌───────────┐  ┌─────────────┐  ┌──────────────┐
//!  │  targets  │  │ packages  │  │  rev deps   │  │   pending    │
//!  │ (DashMap) │  │ (DashMap) │  │  (DashMap)  │  │  (RwLock)    │
//!  └───────────┘  └───────────┘  └─────────────┘  └──────────────┘
//! ```
//!
//! Single-key lookups hit the striped maps directly. Recording or draining
//! pending waiters, linking through provide tables and the readiness predicates
//! all run under the `RwLock` that owns the pending waiters.
//!
//! ## Provide / require
//!
//! A target may offer other labels in its place, keyed by a context tag
//! (for example a language). A consumer that `requires` that tag and depends on
//! the target is linked to the provided labels instead:
//!
//! ```rust
//! use plinth_graph::{BuildGraph, BuildLabel, BuildTarget};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = BuildGraph::new();
//! let proto = BuildLabel::parse("//proto:api")?;
//! let proto_go = BuildLabel::parse("//proto:api_go")?;
//! let server = BuildLabel::parse("//server:server")?;
//!
//! graph.add_target(
//!     BuildTarget::builder(proto.clone())
//!         .provide("go", proto_go.clone())
//!         .build(),
//! )?;
//! graph.add_target(BuildTarget::builder(server.clone()).requires("go").build())?;
//!
//! // The provided target doesn't exist yet; the edge waits for it.
//! graph.add_dependency(server.clone(), proto.clone())?;
//! let server_target = graph.target_or_die(&server)?;
//! assert!(!graph.all_dependencies_resolved(&server_target));
//!
//! graph.add_target(BuildTarget::builder(proto_go.clone()).build())?;
//! assert!(graph.all_dependencies_resolved(&server_target));
//! assert_eq!(server_target.resolved_labels_for(&proto), vec![proto_go]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Registering a label or package name twice, and `*_or_die` lookups that come up
//! empty, return a [`GraphError`] for which [`GraphError::is_fatal`] is true. The
//! invocation driver is expected to abort on those.

pub mod error;
pub mod label;
pub mod package;
pub mod state;
pub mod target;

// In-memory implementation
mod memory;

pub use error::{GraphError, Result};
pub use label::{BuildLabel, LabelError};
pub use memory::{BuildGraph, GraphStatistics};
pub use package::Package;
pub use state::{TargetState, TestResults};
pub use target::{BuildInput, BuildTarget, BuildTargetBuilder};

#[cfg(test)]
mod tests;
