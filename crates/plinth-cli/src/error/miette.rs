//! Miette diagnostic conversion for CLI errors.

use miette::Report;
use plinth_graph::GraphError;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Graph(e) => graph_error_to_miette(e),
        CliError::UnresolvedDependencies { .. } => miette::miette!(
            "{}\n\nHint: Add the missing targets to the manifest, or drop --strict to report them as warnings",
            err
        ),
        _ => miette::miette!("{}", err),
    }
}

/// Convert GraphError to miette Report
pub fn graph_error_to_miette(err: GraphError) -> Report {
    match &err {
        GraphError::DuplicateTarget { label } => miette::miette!(
            "{}\n\nHint: {} is declared twice; target names must be unique within package '{}'",
            err,
            label,
            label.package()
        ),
        GraphError::DuplicatePackage { name } => miette::miette!(
            "{}\n\nHint: Package '{}' appears more than once in the manifest",
            err,
            name
        ),
        GraphError::TargetNotFound { label } => miette::miette!(
            "{}\n\nHint: Check that {} is declared in package '{}'",
            err,
            label,
            label.package()
        ),
        _ => miette::miette!("{}", err),
    }
}
