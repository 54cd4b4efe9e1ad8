//! Layered loading with figment.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use tracing::debug;

use crate::config::{ConfigOverrides, PlinthConfig};
use crate::error::{ConfigError, Result};

/// File picked up from the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "plinth.toml";

pub const ENV_PREFIX: &str = "PLINTH_";

/// Builds a [`PlinthConfig`] from defaults, a config file, the environment and
/// command-line overrides, in increasing priority.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    root: Option<PathBuf>,
    file: Option<PathBuf>,
    overrides: ConfigOverrides,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory searched for `plinth.toml`. Defaults to the current directory.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Explicit config file. Unlike the implicit `plinth.toml`, it must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    fn config_file(&self) -> Result<Option<PathBuf>> {
        if let Some(path) = &self.file {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.clone()));
            }
            return Ok(Some(path.clone()));
        }
        let root = self.root.as_deref().unwrap_or_else(|| Path::new("."));
        let implicit = root.join(CONFIG_FILE_NAME);
        Ok(implicit.is_file().then_some(implicit))
    }

    pub fn figment(&self) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(PlinthConfig::default()));

        if let Some(path) = self.config_file()? {
            debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(&self.overrides));
        Ok(figment)
    }

    pub fn load(&self) -> Result<PlinthConfig> {
        let config: PlinthConfig = self.figment()?.extract()?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }
}
