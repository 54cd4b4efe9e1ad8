//! Plinth CLI - the invocation driver for the plinth build graph.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `graph` and `query`
//! - [`manifest`] - the build manifest format fed into the graph
//! - [`error`] - [`CliError`](error::CliError) and its miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - status messages on stderr

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod manifest;
pub mod ui;

use plinth_config::{ConfigLoader, ConfigOverrides, PlinthConfig};

/// Fold the flags given on the command line into the layered configuration.
pub fn load_config(args: &cli::Cli) -> error::Result<PlinthConfig> {
    let overrides = match &args.command {
        cli::Command::Graph(graph) => ConfigOverrides {
            jobs: graph.jobs,
            strict: graph.strict.then_some(true),
            report: graph.format.map(Into::into),
            ..Default::default()
        },
        cli::Command::Query(query) => ConfigOverrides {
            jobs: query.jobs,
            report: query.format.map(Into::into),
            ..Default::default()
        },
    };

    let mut loader = ConfigLoader::new().overrides(overrides);
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    Ok(loader.load()?)
}

/// Run the parsed command with its resolved configuration.
pub fn run(args: cli::Cli, config: &PlinthConfig) -> error::Result<()> {
    match args.command {
        cli::Command::Graph(graph) => commands::graph::execute(&graph.manifest, config),
        cli::Command::Query(query) => commands::query::execute(&query, config),
    }
}
