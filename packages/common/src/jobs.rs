use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::mq::Message;

/// Job asking the server to re-scan the group listing for new photos.
///
/// Fire-and-forget: no delivery or ordering guarantee is assumed, and
/// discovery is idempotent so duplicate deliveries are harmless.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DiscoverPhotosJob {
    /// Job identifier (UUID)
    pub job_id: String,
}

impl DiscoverPhotosJob {
    pub fn new() -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for DiscoverPhotosJob {
    fn default() -> Self {
        Self::new()
    }
}

impl Message for DiscoverPhotosJob {
    fn message_type() -> &'static str {
        "discover_photos"
    }

    fn message_id(&self) -> &str {
        &self.job_id
    }
}

/// Job asking the server to refresh one photo's remote activity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefreshActivityJob {
    /// Job identifier (UUID)
    pub job_id: String,
    /// Remote uid of the tracked photo to refresh.
    pub photo_uid: String,
}

impl RefreshActivityJob {
    pub fn new(photo_uid: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            photo_uid: photo_uid.into(),
        }
    }
}

impl Message for RefreshActivityJob {
    fn message_type() -> &'static str {
        "refresh_activity"
    }

    fn message_id(&self) -> &str {
        &self.job_id
    }
}
