use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::photo;

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub uid: String,
    pub title: String,
    pub owner_id: String,
    pub owner_name: String,
    pub page_url: String,
    pub image_url: String,
    pub thumb_url: String,
    pub last_modified: i64,
    pub created_at: DateTime<Utc>,
}

impl From<photo::Model> for PhotoResponse {
    fn from(m: photo::Model) -> Self {
        Self {
            uid: m.uid,
            title: m.title,
            owner_id: m.owner_id,
            owner_name: m.owner_name,
            page_url: m.page_url,
            image_url: m.image_url,
            thumb_url: m.thumb_url,
            last_modified: m.last_modified,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PhotoListResponse {
    pub count: usize,
    pub data: Vec<PhotoResponse>,
}

/// Result of one discovery round.
#[derive(Debug, Serialize)]
pub struct DiscoverResponse {
    pub new_photo_uids: Vec<String>,
}
