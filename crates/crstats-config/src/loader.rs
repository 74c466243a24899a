//! Configuration loading and persistence with atomic file operations.

use crate::schema::Config;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};

/// Environment variable that overrides the token stored on disk.
pub const TOKEN_ENV_VAR: &str = "DISCORD_TOKEN";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading or writing the configuration file
    #[error("Failed to access configuration file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("Failed to parse configuration '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] crstats_common::CrStatsError),
}

impl From<ConfigError> for crstats_common::CrStatsError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Loads and saves the configuration file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the managed configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads, parses, applies environment overrides and validates the configuration.
    pub fn load(&self) -> Result<Config, ConfigError> {
        let mut config = self.read()?;
        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());

        if let Err(e) = config.validate() {
            error!("Loading Err > Path: {} Err: {}", self.path.display(), e);
            return Err(ConfigError::Validation(e));
        }

        info!("Loaded configuration from {}", self.path.display());
        Ok(config)
    }

    /// Reads and parses the file without overrides or validation.
    pub fn read(&self) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            error!("Loading Err > Path: {} Err: {}", self.path.display(), source);
            ConfigError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        serde_json::from_str(&content).map_err(|source| {
            error!("Loading Err > Path: {} Err: {}", self.path.display(), source);
            ConfigError::Parse {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Writes the configuration atomically: a temporary file in the same directory
    /// is fully written and then renamed over the target.
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let io_err = |source: std::io::Error| {
            error!("Saving Err > Path: {} Err: {}", self.path.display(), source);
            ConfigError::Io {
                path: self.path.clone(),
                source,
            }
        };

        let directory = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = tempfile::NamedTempFile::new_in(directory).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut file, config).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })?;
        file.write_all(b"\n").map_err(io_err)?;
        file.as_file().sync_all().map_err(io_err)?;
        file.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn apply_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV_VAR).filter(|t| !t.trim().is_empty()) {
            debug!("Using bot token from {}", TOKEN_ENV_VAR);
            config.token = token;
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new("config.json")
    }
}
