//! Configuration for the plinth invocation driver.
//!
//! Values are layered, later sources winning: built-in defaults, `plinth.toml`,
//! `PLINTH_*` environment variables, then explicit command-line overrides.

pub mod config;
pub mod error;
pub mod loading;

pub use config::{ConfigOverrides, PlinthConfig, ReportFormat};
pub use error::{ConfigError, Result};
pub use loading::{CONFIG_FILE_NAME, ConfigLoader, ENV_PREFIX};
