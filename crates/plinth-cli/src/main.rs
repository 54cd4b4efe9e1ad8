//! Plinth CLI entry point: argument parsing, configuration, logging and
//! command dispatch.

use clap::Parser;
use miette::Result;
use plinth_cli::{cli, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    ui::init(args.no_color, args.quiet);
    let config = match plinth_cli::load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            logger::init_logger(args.verbose, args.quiet, args.no_color, None);
            return Err(error::cli_error_to_miette(err));
        }
    };
    logger::init_logger(
        args.verbose,
        args.quiet,
        args.no_color,
        config.log_level.as_deref(),
    );

    plinth_cli::run(args, &config).map_err(error::cli_error_to_miette)
}
