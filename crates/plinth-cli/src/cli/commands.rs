use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use plinth_config::ReportFormat;

fn parse_jobs(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(jobs) => Ok(jobs),
        Err(err) => Err(err.to_string()),
    }
}

/// Available plinth subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a manifest and report the linked graph
    ///
    /// Every package is registered by its own worker. Once all workers finish,
    /// each target is listed in label order with its resolved dependencies,
    /// reverse dependencies and readiness.
    Graph(GraphArgs),

    /// Show which targets a dependency edge resolves to
    ///
    /// Loads the manifest, then prints the labels FROM is linked to when it
    /// depends on TO, after provide/require indirection.
    Query(QueryArgs),
}

/// Report format for command output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportFormat::Text,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Build manifest (.toml or .json)
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Number of parse workers
    #[arg(short, long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Fail if any dependency is still unresolved after loading
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the query command
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Build manifest (.toml or .json)
    #[arg(value_name = "MANIFEST")]
    pub manifest: PathBuf,

    /// Consuming target, e.g. //app:server
    #[arg(value_name = "FROM")]
    pub from: String,

    /// Declared dependency, e.g. //proto:api
    #[arg(value_name = "TO")]
    pub to: String,

    /// Number of parse workers
    #[arg(short, long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,
}
