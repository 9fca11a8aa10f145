use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::MqAppConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default = "default_allow_origins")]
    pub allow_origins: Vec<String>,
}

fn default_allow_origins() -> Vec<String> {
    vec!["*".into()]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origins: default_allow_origins(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

/// Settings for the remote content source (Flickr-style REST API).
#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub api_key: String,
    /// Identifier of the photo group whose pool is tracked.
    pub group_id: String,
    pub endpoint: String,
    /// Upper bound on photos touched by one batch sync / enqueue round.
    pub fetch_limit: u64,
    /// Page size for the activity log.
    pub page_size: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub mq: MqAppConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "postgres://localhost:5432/lenspool")?
            .set_default("source.api_key", "")?
            .set_default("source.group_id", "")?
            .set_default("source.endpoint", "https://api.flickr.com/services/rest/")?
            .set_default("source.fetch_limit", 100)?
            .set_default("source.page_size", 10)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., LENSPOOL__SOURCE__API_KEY)
            .add_source(Environment::with_prefix("LENSPOOL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
