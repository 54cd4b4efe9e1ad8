//! Terminal output helpers.
//!
//! Status messages go to stderr; reports are printed to stdout by the commands.

use std::sync::atomic::{AtomicBool, Ordering};

mod messages;

pub use messages::{info, success, warning};

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, then falls back to whether stderr is a
/// terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::user_attended_stderr()
}

static QUIET: AtomicBool = AtomicBool::new(false);

/// Decide once whether status messages are colored, and whether they are
/// shown at all.
pub fn init(no_color: bool, quiet: bool) {
    console::set_colors_enabled_stderr(!no_color && should_use_color());
    QUIET.store(quiet, Ordering::Relaxed);
}

pub(crate) fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

pub(crate) fn colors_enabled() -> bool {
    console::colors_enabled_stderr()
}
