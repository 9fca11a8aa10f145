use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One photo in the tracked group pool. Created on first sighting in
/// the group listing, never deleted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Remote uid of the photo; the natural key everywhere else.
    #[sea_orm(unique)]
    pub uid: String,
    pub title: String,
    pub owner_id: String,
    pub owner_name: String,
    pub page_url: String,
    pub image_url: String,
    pub thumb_url: String,
    /// Last-synchronized revision marker (remote `lastupdate` epoch).
    /// 0 means the photo has never been synced. Monotonically
    /// non-decreasing; only the sync pipeline writes it.
    pub last_modified: i64,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
