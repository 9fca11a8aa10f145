use std::sync::Arc;

use common::{DiscoverPhotosJob, RefreshActivityJob};
use mq::{BroccoliError, BrokerMessage, Mq};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, QuerySelect};
use tracing::{error, info, warn};

use crate::entity::photo;
use crate::source::PhotoSource;
use crate::sync;

/// Consume discovery jobs: scan the group listing, then fan out one
/// refresh job per tracked photo.
pub async fn consume_discovery_jobs(
    db: DatabaseConnection,
    mq: Arc<Mq>,
    source: Arc<dyn PhotoSource>,
    queue_name: String,
    refresh_queue: String,
    fetch_limit: u64,
) {
    info!(queue = %queue_name, "Starting discovery consumer");

    let publisher = mq.clone();
    let result = mq
        .process_messages(
            &queue_name,
            None, // single-threaded for sequential DB writes
            None,
            move |message: BrokerMessage<DiscoverPhotosJob>| {
                let db = db.clone();
                let mq = publisher.clone();
                let source = source.clone();
                let refresh_queue = refresh_queue.clone();
                async move {
                    let job_id = message.payload.job_id;

                    let new_uids = sync::discover_photos(&db, source.as_ref())
                        .await
                        .map_err(|e| {
                            error!(job_id = %job_id, error = %e, "Discovery round failed");
                            BroccoliError::Job(e.to_string())
                        })?;

                    let fanned_out =
                        fan_out_refresh_jobs(&db, &mq, &refresh_queue, fetch_limit).await?;

                    info!(
                        job_id = %job_id,
                        new_photos = new_uids.len(),
                        refresh_jobs = fanned_out,
                        "Discovery job processed"
                    );
                    Ok(())
                }
            },
        )
        .await;

    if let Err(e) = result {
        error!(error = %e, "Discovery consumer stopped unexpectedly");
    }
}

/// Enqueue a refresh job for each tracked photo, most recently
/// modified first, bounded by `fetch_limit`.
async fn fan_out_refresh_jobs(
    db: &DatabaseConnection,
    mq: &Mq,
    refresh_queue: &str,
    fetch_limit: u64,
) -> Result<usize, BroccoliError> {
    let photos = photo::Entity::find()
        .order_by_desc(photo::Column::LastModified)
        .limit(fetch_limit)
        .all(db)
        .await
        .map_err(|e| BroccoliError::Job(e.to_string()))?;

    let mut fanned_out = 0;
    for p in photos {
        let job = RefreshActivityJob::new(&p.uid);
        match mq.publish(refresh_queue, None, &job, None).await {
            Ok(_) => fanned_out += 1,
            Err(e) => {
                // One failed publish should not abort the fan-out.
                warn!(photo_uid = %p.uid, error = %e, "Failed to enqueue refresh job");
            }
        }
    }
    Ok(fanned_out)
}
