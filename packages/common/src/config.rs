use serde::Deserialize;

/// App-level MQ configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct MqAppConfig {
    /// Whether MQ is enabled. Default: true. When disabled the server
    /// still works; `/sync/enqueue` returns an error instead.
    #[serde(default = "default_mq_enabled")]
    pub enabled: bool,
    /// Redis connection URL. Default: "redis://localhost:6379".
    #[serde(default = "default_mq_url")]
    pub url: String,
    /// Connection pool size. Default: 5.
    #[serde(default = "default_mq_pool_size")]
    pub pool_size: u8,
    /// Queue name for group-listing discovery jobs. Default: "photo_discovery".
    #[serde(default = "default_discovery_queue_name")]
    pub discovery_queue_name: String,
    /// Queue name for per-photo activity refresh jobs. Default: "activity_refresh".
    #[serde(default = "default_refresh_queue_name")]
    pub refresh_queue_name: String,
}

fn default_mq_enabled() -> bool {
    true
}
fn default_mq_url() -> String {
    "redis://localhost:6379".into()
}
fn default_mq_pool_size() -> u8 {
    5
}
fn default_discovery_queue_name() -> String {
    "photo_discovery".into()
}
fn default_refresh_queue_name() -> String {
    "activity_refresh".into()
}

impl Default for MqAppConfig {
    fn default() -> Self {
        Self {
            enabled: default_mq_enabled(),
            url: default_mq_url(),
            pool_size: default_mq_pool_size(),
            discovery_queue_name: default_discovery_queue_name(),
            refresh_queue_name: default_refresh_queue_name(),
        }
    }
}
