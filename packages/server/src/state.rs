use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::source::PhotoSource;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// None when MQ is disabled in config.
    pub mq: Option<Arc<mq::Mq>>,
    pub source: Arc<dyn PhotoSource>,
    pub config: Arc<AppConfig>,
}
