//! Logging setup for the plinth driver.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for the plinth crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `log_level` from the configuration
//! 5. `plinth=info`

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "plinth=debug,plinth_graph=debug,plinth_config=debug,plinth_cli=debug";
const QUIET_FILTER: &str = "error";
const DEFAULT_FILTER: &str = "plinth=info,plinth_graph=info,plinth_config=info,plinth_cli=info";

/// Pick the filter for the given flags and configured level.
pub fn build_filter(verbose: bool, quiet: bool, configured: Option<&str>) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            configured
                .and_then(|level| EnvFilter::try_new(level).ok())
                .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
        })
    }
}

/// Install the global subscriber. Logs go to stderr so reports on stdout stay
/// machine-readable.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, configured: Option<&str>) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    // A subscriber may already be installed when the driver runs in-process.
    let _ = tracing_subscriber::registry()
        .with(build_filter(verbose, quiet, configured))
        .with(fmt_layer)
        .try_init();
}
