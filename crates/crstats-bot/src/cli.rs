//! Command line arguments.

use clap::Parser;
use crstats_common::logging::LoggingConfig;
use crstats_config::{Config, ConfigError, ConfigLoader};
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "CRSTATS_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// File every error is appended to
    #[arg(long, default_value = "errors.log")]
    pub error_log: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Logging setup for these arguments.
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.log_level.clone(),
            error_log: Some(self.error_log.clone()),
            ..LoggingConfig::default()
        }
    }

    /// Loads the configuration file named on the command line. Failures are
    /// logged by the loader.
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        ConfigLoader::new(&self.config).load()
    }
}
