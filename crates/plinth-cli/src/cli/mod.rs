//! Command-line interface definition for plinth.
//!
//! - `plinth graph` - load a manifest and report the linked target graph
//! - `plinth query` - show what a dependency edge resolves to

mod commands;

use std::path::PathBuf;

use clap::Parser;

pub use commands::{Command, GraphArgs, OutputFormat, QueryArgs};

/// Plinth - concurrent build target graph
#[derive(Parser, Debug)]
#[command(
    name = "plinth",
    version,
    about = "Load build targets concurrently and link their dependencies",
    long_about = "Plinth reads a build manifest, registers every package on its own worker\n\
                  and links dependency edges as targets are discovered, following\n\
                  provide/require indirection between targets."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress logs and status messages except errors; reports still go to stdout
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file to use instead of ./plinth.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_graph() {
        let cli = Cli::parse_from([
            "plinth", "graph", "BUILD.toml", "--jobs", "4", "--strict", "--format", "json",
        ]);
        match cli.command {
            Command::Graph(args) => {
                assert_eq!(args.manifest, PathBuf::from("BUILD.toml"));
                assert_eq!(args.jobs, Some(4));
                assert!(args.strict);
                assert_eq!(args.format, Some(OutputFormat::Json));
            }
            other => panic!("expected graph command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_query_with_global_flags() {
        let cli = Cli::parse_from([
            "plinth", "query", "m.json", "//a:a", "//b:b", "--quiet", "--config", "ci.toml",
        ]);
        assert!(cli.quiet);
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        match cli.command {
            Command::Query(args) => {
                assert_eq!(args.from, "//a:a");
                assert_eq!(args.to, "//b:b");
                assert_eq!(args.format, None);
            }
            other => panic!("expected query command, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let result = Cli::try_parse_from(["plinth", "graph", "m.toml", "--jobs", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        let result = Cli::try_parse_from(["plinth", "-v", "-q", "graph", "m.toml"]);
        assert!(result.is_err());
    }
}
