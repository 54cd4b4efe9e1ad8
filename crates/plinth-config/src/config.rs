//! Configuration values and their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// How the driver renders its final report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlinthConfig {
    /// Size of the parse worker pool. `None` lets rayon pick.
    pub jobs: Option<usize>,

    /// Fail the invocation when edges are still waiting after parsing.
    pub strict: bool,

    /// Tracing filter used when neither `RUST_LOG` nor a verbosity flag is set.
    pub log_level: Option<String>,

    pub report: ReportFormat,
}

impl PlinthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "jobs".to_string(),
                hint: "must be at least 1; leave it unset to use every core".to_string(),
            });
        }
        if self.log_level.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "log_level".to_string(),
                hint: "expected a tracing filter such as \"info\" or \"plinth=debug\"".to_string(),
            });
        }
        Ok(())
    }
}

/// Values given explicitly on the command line. Unset fields leave the lower
/// layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportFormat>,
}
