use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait, QueryFilter, Set,
    TransactionTrait,
};
use thiserror::Error;
use tracing::info;

use crate::entity::{activity, contributor, vote};

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("activity '{0}' not found")]
    ActivityNotFound(String),

    #[error(transparent)]
    Db(#[from] DbErr),
}

/// The two counters returned to the voter after a successful vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTally {
    pub vote_count: i32,
    pub vote_sum: i32,
}

/// Record one vote: bump the target activity's counters, mirror the
/// bump on the recipient's contributor record, and append the
/// immutable ledger entry.
///
/// All three writes share one transaction, and the counter bumps are
/// single-statement SQL increments, so concurrent votes on the same
/// target cannot lose updates and the ledger can never diverge from
/// the counters. There is deliberately no idempotency key: a
/// resubmitted vote counts fully.
pub async fn record_vote(
    db: &DatabaseConnection,
    recipient: &str,
    activity_id: &str,
    value: i32,
    voter: &str,
) -> Result<VoteTally, VoteError> {
    let txn = db.begin().await?;

    let updated = activity::Entity::update_many()
        .col_expr(
            activity::Column::VoteCount,
            Expr::col(activity::Column::VoteCount).add(1),
        )
        .col_expr(
            activity::Column::VoteSum,
            Expr::col(activity::Column::VoteSum).add(value),
        )
        .filter(activity::Column::ActivityId.eq(activity_id))
        .exec(&txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(VoteError::ActivityNotFound(activity_id.to_string()));
    }

    let now = Utc::now();

    // A recipient never seen before gets a fresh row carrying this
    // vote; an existing row gets its counters incremented in the same
    // statement. The single upsert keeps concurrent first votes for
    // one author from colliding on the unique author index.
    let fresh = contributor::ActiveModel {
        author: Set(recipient.to_string()),
        last_activity_date: Set(now),
        last_activity_id: Set(activity_id.to_string()),
        vote_sum: Set(value),
        vote_count: Set(1),
        created_at: Set(now),
        ..Default::default()
    };
    let result = contributor::Entity::insert(fresh)
        .on_conflict(
            OnConflict::column(contributor::Column::Author)
                .value(
                    contributor::Column::VoteCount,
                    Expr::col(contributor::Column::VoteCount).add(1),
                )
                .value(
                    contributor::Column::VoteSum,
                    Expr::col(contributor::Column::VoteSum).add(value),
                )
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await;
    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    let ledger_entry = vote::ActiveModel {
        recipient: Set(recipient.to_string()),
        voter: Set(voter.to_string()),
        value: Set(value),
        activity_id: Set(activity_id.to_string()),
        created_at: Set(now),
        ..Default::default()
    };
    vote::Entity::insert(ledger_entry)
        .exec_without_returning(&txn)
        .await?;

    txn.commit().await?;

    let target = activity::Entity::find()
        .filter(activity::Column::ActivityId.eq(activity_id))
        .one(db)
        .await?
        .ok_or_else(|| VoteError::ActivityNotFound(activity_id.to_string()))?;

    info!(
        activity_id,
        recipient,
        voter,
        value,
        vote_count = target.vote_count,
        vote_sum = target.vote_sum,
        "Vote recorded"
    );

    Ok(VoteTally {
        vote_count: target.vote_count,
        vote_sum: target.vote_sum,
    })
}
