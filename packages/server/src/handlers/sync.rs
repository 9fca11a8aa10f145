use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::DiscoverPhotosJob;
use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::sync::{EnqueueResponse, SyncResponse};
use crate::state::AppState;
use crate::sync;

/// Run a full batch sync inline and report the outcome.
#[instrument(skip(state))]
pub async fn sync_all(State(state): State<AppState>) -> Result<Json<SyncResponse>, AppError> {
    let report = sync::sync_all(
        &state.db,
        state.source.as_ref(),
        state.config.source.fetch_limit,
    )
    .await?;
    Ok(Json(SyncResponse { report }))
}

/// Hand the sync round to the queue instead of running it inline.
///
/// Publishes one discovery job; the discovery consumer fans out a
/// refresh job per tracked photo.
#[instrument(skip(state))]
pub async fn enqueue_sync(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let Some(ref mq) = state.mq else {
        return Err(AppError::QueueDisabled);
    };

    let job = DiscoverPhotosJob::new();
    let queue = state.config.mq.discovery_queue_name.clone();

    mq.publish(&queue, None, &job, None)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to enqueue discovery job: {e}")))?;

    info!(job_id = %job.job_id, queue = %queue, "Sync round enqueued");

    Ok((
        StatusCode::ACCEPTED,
        Json(EnqueueResponse {
            job_id: job.job_id,
            queue,
        }),
    ))
}
