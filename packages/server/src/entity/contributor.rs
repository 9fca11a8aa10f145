use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Aggregate record per author: most recent activity plus cumulative
/// vote score. One row per author, enforced by the unique index and
/// upsert writes.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contributor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub author: String,
    pub last_activity_date: DateTimeUtc,
    pub last_activity_id: String,

    pub vote_sum: i32,
    pub vote_count: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
