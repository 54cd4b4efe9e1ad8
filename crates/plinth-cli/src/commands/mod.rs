//! Command implementations.

pub mod graph;
mod loader;
pub mod query;

pub use loader::load_graph;
