use std::sync::Arc;

use anyhow::Context;
use mq::MqConfig;
use tracing::{Level, info, warn};

use server::config::AppConfig;
use server::consumers;
use server::database::init_db;
use server::source::FlickrSource;
use server::state::AppState;
use server::{build_router, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = Arc::new(AppConfig::load().context("Failed to load configuration")?);

    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db).await?;

    let mq = if config.mq.enabled {
        let queue = mq::init_mq(MqConfig {
            url: config.mq.url.clone(),
            pool_size: config.mq.pool_size,
        })
        .await
        .context("Failed to connect to message queue")?;
        Some(Arc::new(queue))
    } else {
        warn!("MQ disabled in configuration; /sync/enqueue will be unavailable");
        None
    };

    let source: Arc<dyn server::source::PhotoSource> =
        Arc::new(FlickrSource::new(&config.source));

    if let Some(ref mq) = mq {
        tokio::spawn(consumers::consume_discovery_jobs(
            db.clone(),
            mq.clone(),
            source.clone(),
            config.mq.discovery_queue_name.clone(),
            config.mq.refresh_queue_name.clone(),
            config.source.fetch_limit,
        ));
        tokio::spawn(consumers::consume_refresh_jobs(
            db.clone(),
            mq.clone(),
            source.clone(),
            config.mq.refresh_queue_name.clone(),
        ));
    }

    let state = AppState {
        db,
        mq,
        source,
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
