//! Error types for the plinth driver.
//!
//! Every command returns [`CliError`]. `main` turns it into a
//! [`miette::Report`] via [`cli_error_to_miette`], which ends the process with
//! a non-zero status.

mod miette;

use plinth_config::ConfigError;
use plinth_graph::{BuildLabel, GraphError};
use thiserror::Error;

use crate::manifest::ManifestError;

pub use self::miette::cli_error_to_miette;

pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Graph construction failed; duplicate labels and missing targets end the run.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to render report: {0}")]
    Json(#[from] serde_json::Error),

    /// Strict mode found edges that never reached a registered target.
    #[error("{} label(s) still have waiting dependents: {}", labels.len(), join_labels(labels))]
    UnresolvedDependencies { labels: Vec<BuildLabel> },
}

fn join_labels(labels: &[BuildLabel]) -> String {
    labels
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_message_lists_labels() {
        let err = CliError::UnresolvedDependencies {
            labels: vec![
                BuildLabel::parse("//a:x").unwrap(),
                BuildLabel::parse("//b:y").unwrap(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "2 label(s) still have waiting dependents: //a:x, //b:y"
        );
    }

    #[test]
    fn test_graph_error_is_transparent() {
        let label = BuildLabel::parse("//a:x").unwrap();
        let err = CliError::from(GraphError::TargetNotFound { label });
        assert_eq!(err.to_string(), "target //a:x not found in build graph");
    }
}
