use serde::Serialize;

use crate::sync::SyncReport;

/// Result of a direct (inline) batch sync.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    #[serde(flatten)]
    pub report: SyncReport,
}

/// Result of syncing a single photo inline.
#[derive(Debug, Serialize)]
pub struct SyncPhotoResponse {
    pub photo_uid: String,
    pub new_activity_ids: Vec<String>,
}

/// Acknowledgement for work handed to the queue.
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub job_id: String,
    pub queue: String,
}
