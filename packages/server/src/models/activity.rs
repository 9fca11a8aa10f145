use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::{activity, photo};

/// One activity log entry, joined with locators of its photo so list
/// views can render a thumbnail and a link without extra requests.
#[derive(Debug, Serialize)]
pub struct ActivityItem {
    pub id: i32,
    pub activity_id: String,
    pub photo_uid: String,
    pub author: String,
    pub kind: String,
    pub content: String,
    pub vote_sum: i32,
    pub vote_count: i32,
    pub created_at: DateTime<Utc>,
    pub photo_title: Option<String>,
    pub page_url: Option<String>,
    pub thumb_url: Option<String>,
}

impl ActivityItem {
    pub fn from_parts(model: activity::Model, photo: Option<&photo::Model>) -> Self {
        Self {
            id: model.id,
            activity_id: model.activity_id,
            photo_uid: model.photo_uid,
            author: model.author,
            kind: model.kind,
            content: model.content,
            vote_sum: model.vote_sum,
            vote_count: model.vote_count,
            created_at: model.created_at,
            photo_title: photo.map(|p| p.title.clone()),
            page_url: photo.map(|p| p.page_url.clone()),
            thumb_url: photo.map(|p| p.thumb_url.clone()),
        }
    }
}

/// One keyset-paginated window of the activity log.
#[derive(Debug, Serialize)]
pub struct ActivityPageResponse {
    pub count: usize,
    pub data: Vec<ActivityItem>,
    /// Ordering key to pass as `next` for the following (older) page.
    pub next_cursor: Option<i32>,
    /// Ordering key to pass as `previous` for the preceding (newer) page.
    pub previous_cursor: Option<i32>,
}
