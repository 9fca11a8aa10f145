use std::sync::Arc;

use common::RefreshActivityJob;
use mq::{BroccoliError, BrokerMessage, Mq};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::source::PhotoSource;
use crate::sync::{self, SyncError};

/// Consume per-photo refresh jobs from the refresh queue.
pub async fn consume_refresh_jobs(
    db: DatabaseConnection,
    mq: Arc<Mq>,
    source: Arc<dyn PhotoSource>,
    queue_name: String,
) {
    info!(queue = %queue_name, "Starting activity refresh consumer");

    let result = mq
        .process_messages(
            &queue_name,
            None, // single-threaded for sequential DB writes
            None,
            move |message: BrokerMessage<RefreshActivityJob>| {
                let db = db.clone();
                let source = source.clone();
                async move {
                    let job = message.payload;

                    match sync::sync_photo(&db, source.as_ref(), &job.photo_uid).await {
                        Ok(new_ids) => {
                            info!(
                                job_id = %job.job_id,
                                photo_uid = %job.photo_uid,
                                new_activities = new_ids.len(),
                                "Refresh job processed"
                            );
                            Ok(())
                        }
                        // The photo was never tracked or is gone;
                        // retrying cannot succeed.
                        Err(SyncError::PhotoNotFound(uid)) => {
                            warn!(job_id = %job.job_id, photo_uid = %uid, "Refresh job for untracked photo, dropping");
                            Ok(())
                        }
                        Err(e) => {
                            error!(
                                job_id = %job.job_id,
                                photo_uid = %job.photo_uid,
                                error = %e,
                                "Failed to process refresh job"
                            );
                            Err(BroccoliError::Job(e.to_string()))
                        }
                    }
                }
            },
        )
        .await;

    if let Err(e) = result {
        error!(error = %e, "Activity refresh consumer stopped unexpectedly");
    }
}
