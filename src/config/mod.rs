//! Configuration management for the scaffold service.
//! This module handles loading and layering configuration settings
//! from files and environment variables.

mod settings;

pub use settings::{
    ApiSection, AppSection, CacheSection, DatabaseConnection, DatabaseSection, LoggingConfig,
    MailFrom, MailSection, RateLimitConfig, SecuritySection, ServerConfig, Settings, UploadSection,
};

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, config::ConfigError>;

/// Load the application configuration
pub fn load_config() -> ConfigResult<Settings> {
    Settings::load()
}
