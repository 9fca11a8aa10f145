use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, Set};

use crate::entity::contributor;

/// Look up or create the contributor record for `author` and stamp it
/// with the latest activity.
///
/// The stamp is unconditional last-write-wins: no staleness check, by
/// contract. A single upsert statement keeps the "at most one row per
/// author" invariant even when two syncs see the same new author
/// concurrently.
pub async fn stamp_contributor<C: ConnectionTrait>(
    db: &C,
    author: &str,
    activity_id: &str,
    now: DateTime<Utc>,
) -> Result<(), DbErr> {
    let model = contributor::ActiveModel {
        author: Set(author.to_string()),
        last_activity_date: Set(now),
        last_activity_id: Set(activity_id.to_string()),
        vote_sum: Set(0),
        vote_count: Set(0),
        created_at: Set(now),
        ..Default::default()
    };

    let result = contributor::Entity::insert(model)
        .on_conflict(
            OnConflict::column(contributor::Column::Author)
                .update_columns([
                    contributor::Column::LastActivityDate,
                    contributor::Column::LastActivityId,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(e),
    }
}
