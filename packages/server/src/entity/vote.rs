use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only vote ledger. No uniqueness constraint: a resubmitted
/// vote is indistinguishable from a second genuine vote and counts
/// fully. Counters on activity/contributor are maintained
/// incrementally, never recomputed from this table.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vote")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Author whose contribution was voted on.
    pub recipient: String,
    pub voter: String,
    /// +1 or -1.
    pub value: i32,
    /// `activity_id` of the target activity.
    pub activity_id: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
