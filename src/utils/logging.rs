use std::env;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::utils::ScaffoldResult;

/// Initialize the tracing subscriber with the configured log level
pub fn init_logging() {
    // Get the log level from environment variable or default to INFO
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // try_init so repeated calls (e.g. from tests) are harmless
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .ok();
}

/// Create a new span for tracking request context
pub fn create_request_span(request_id: &str) -> tracing::Span {
    tracing::info_span!("request", request_id = %request_id)
}

/// Severity levels understood by the application log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parse a configured level name; unknown names fall back to Info
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warning" | "warn" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Application log file writer
///
/// Appends `[timestamp] [level] [clientIP] message` lines to the configured
/// file when logging is enabled. The parent directory is created on demand.
#[derive(Debug, Clone)]
pub struct FileLogger {
    config: LoggingConfig,
}

impl FileLogger {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Append one timestamped line to the log file
    ///
    /// Messages below the configured minimum level are dropped. Returns
    /// Ok(()) without touching the filesystem when logging is disabled.
    pub fn log(&self, message: &str, level: LogLevel, client_ip: &str) -> ScaffoldResult<()> {
        if !self.config.enabled {
            return Ok(());
        }

        if level < LogLevel::parse(&self.config.level) {
            return Ok(());
        }

        let path = PathBuf::from(&self.config.file);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{timestamp}] [{}] [{client_ip}] {message}\n", level.as_str());

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }
}
