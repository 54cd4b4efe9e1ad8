//! In-memory BuildGraph: target and package registries, the pending and reverse
//! dependency indices, and the linker that ties them together.

mod construction;
mod graph;
mod linking;
mod mutations;
mod queries;
mod statistics;

pub use graph::BuildGraph;
pub use statistics::GraphStatistics;
