use std::collections::HashMap;
use std::env;
use std::path::Path;

use serde::Deserialize;

/// Configuration settings for the scaffold service
///
/// Values are layered: built-in defaults, then `config/app.toml`, then the
/// `config/<APP_ENV>.toml` override, then `APP__*` environment variables.
/// An override source replaces only the leaf keys it defines; everything
/// else keeps the base value. A missing base file degrades to defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Application identity and mode
    pub app: AppSection,
    /// IANA timezone label, reported on the diagnostic pages
    pub timezone: String,
    /// HTTP server bind address
    pub server: ServerConfig,
    /// Database connection settings
    pub database: DatabaseSection,
    /// Security settings
    pub security: SecuritySection,
    /// Application log file settings
    pub logging: LoggingConfig,
    /// File upload settings
    pub upload: UploadSection,
    /// API settings, including the rate limiter
    pub api: ApiSection,
    /// Outbound mail settings
    pub mail: MailSection,
    /// Cache store settings
    pub cache: CacheSection,
    /// Free-form application specific settings
    pub custom: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
    pub version: String,
    pub debug: bool,
    /// development, staging or production
    pub environment: String,
}

/// Server configuration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind the server to
    pub host: String,
    /// Port number to listen on
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub default: DatabaseConnection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConnection {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub charset: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub encryption_key: String,
    /// Session lifetime in seconds
    pub session_lifetime: u64,
    pub csrf_protection: bool,
    pub allowed_origins: Vec<String>,
}

/// Application log file settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    /// Minimum severity written to the file: debug, info, warning, error
    pub level: String,
    /// Log file path; the parent directory is created on demand
    pub file: String,
    /// Maximum log file size in bytes
    pub max_size: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSection {
    pub max_size: u64,
    pub allowed_types: Vec<String>,
    pub upload_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub rate_limit: RateLimitConfig,
    pub version: String,
    pub base_url: String,
}

/// Rate limiting configuration settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Maximum number of requests allowed per minute per client
    pub requests_per_minute: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailSection {
    pub driver: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub encryption: String,
    pub from: MailFrom,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailFrom {
    pub address: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    pub default: String,
    /// Directory backing the file cache, also used by the rate limiter
    pub path: String,
}

impl Settings {
    /// Load configuration for the environment selected by `APP_ENV`
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load_for_env(&environment)
    }

    /// Load configuration from the default `config/` directory
    pub fn load_for_env(environment: &str) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/app").required(false))
            .add_source(config::File::with_name(&format!("config/{environment}")).required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from an explicit directory, without the
    /// environment variable source
    pub fn load_from_dir(dir: &Path, environment: &str) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(dir.join("app.toml")).required(false))
            .add_source(config::File::from(dir.join(format!("{environment}.toml"))).required(false))
            .build()?;

        config.try_deserialize()
    }
}

/// Default values for configuration settings
impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSection::default(),
            timezone: "UTC".to_string(),
            server: ServerConfig::default(),
            database: DatabaseSection::default(),
            security: SecuritySection::default(),
            logging: LoggingConfig::default(),
            upload: UploadSection::default(),
            api: ApiSection::default(),
            mail: MailSection::default(),
            cache: CacheSection::default(),
            custom: HashMap::new(),
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "scaffold".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            debug: true,
            environment: "development".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            default: DatabaseConnection::default(),
        }
    }
}

impl Default for DatabaseConnection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            database: "scaffold".to_string(),
            username: String::new(),
            password: String::new(),
            charset: "utf8mb4".to_string(),
        }
    }
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            encryption_key: String::new(),
            session_lifetime: 3600,
            csrf_protection: true,
            allowed_origins: vec!["localhost".to_string(), "127.0.0.1".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            file: "private/logs/app.log".to_string(),
            max_size: 10 * 1024 * 1024,
        }
    }
}

impl Default for UploadSection {
    fn default() -> Self {
        Self {
            max_size: 2 * 1024 * 1024,
            allowed_types: ["jpg", "jpeg", "png", "gif", "pdf", "txt"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            upload_path: "private/uploads".to_string(),
        }
    }
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            rate_limit: RateLimitConfig::default(),
            version: "v1".to_string(),
            base_url: "/api/".to_string(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 60,
        }
    }
}

impl Default for MailSection {
    fn default() -> Self {
        Self {
            driver: "smtp".to_string(),
            host: String::new(),
            port: 587,
            username: String::new(),
            password: String::new(),
            encryption: "tls".to_string(),
            from: MailFrom::default(),
        }
    }
}

impl Default for MailFrom {
    fn default() -> Self {
        Self {
            address: String::new(),
            name: String::new(),
        }
    }
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            default: "file".to_string(),
            path: "private/cache".to_string(),
        }
    }
}
