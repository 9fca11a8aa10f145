use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One recorded social event (tag, note, comment, or photo added).
///
/// `activity_id` uniqueness is the sole deduplication mechanism: an
/// event is new iff no row with its id exists. Rows are immutable
/// except for the two vote counters. `id` (insertion order) is the
/// ordering key of the activity log.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Remote event id, or the photo uid for "photo added" events.
    #[sea_orm(unique)]
    pub activity_id: String,
    /// Remote uid of the photo this event belongs to.
    pub photo_uid: String,
    pub author: String,
    /// One of: photo, tag, note, comment
    pub kind: String,
    pub content: String,

    pub vote_sum: i32,
    pub vote_count: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
