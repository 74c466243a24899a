//! Structured logging infrastructure.
//!
//! Console output goes through a regular `fmt` layer. When an error log path is
//! configured, every `ERROR` event is additionally appended to that file through a
//! non-blocking `tracing-appender` writer.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "crstats_commands=trace")
    pub level: String,
    /// File that receives a copy of every error event
    pub error_log: Option<PathBuf>,
    /// Whether to colour console output
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            error_log: Some(PathBuf::from("errors.log")),
            ansi: true,
        }
    }
}

/// Initialize the tracing subscriber with the given configuration.
///
/// The returned guard flushes the error log on drop and must be kept alive for the
/// lifetime of the process.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = fmt::layer()
        .with_ansi(config.ansi)
        .with_target(true)
        .with_filter(env_filter);

    let (file_layer, guard) = match &config.error_log {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), PathBuf::from);
            let file_name = path
                .file_name()
                .ok_or_else(|| format!("error log path has no file name: {}", path.display()))?;

            std::fs::create_dir_all(&directory)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::ERROR);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}
