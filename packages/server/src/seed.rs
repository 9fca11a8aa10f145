use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{activity, contributor, vote};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Per-photo activity listing.
    let photo_uid = Index::create()
        .if_not_exists()
        .name("idx_activity_photo_uid")
        .table(activity::Entity)
        .col(activity::Column::PhotoUid)
        .to_owned();

    // Keyset pages over the unvoted subset:
    // WHERE vote_count = 0 ORDER BY id DESC
    let unvoted = Index::create()
        .if_not_exists()
        .name("idx_activity_vote_count_id")
        .table(activity::Entity)
        .col(activity::Column::VoteCount)
        .col(activity::Column::Id)
        .to_owned();

    // Contributor listing, most recently active first.
    let last_active = Index::create()
        .if_not_exists()
        .name("idx_contributor_last_activity_date")
        .table(contributor::Entity)
        .col(contributor::Column::LastActivityDate)
        .to_owned();

    // Per-recipient vote history.
    let vote_recipient = Index::create()
        .if_not_exists()
        .name("idx_vote_recipient_created")
        .table(vote::Entity)
        .col(vote::Column::Recipient)
        .col(vote::Column::CreatedAt)
        .to_owned();

    ensure_index(db, "idx_activity_photo_uid", &photo_uid).await;
    ensure_index(db, "idx_activity_vote_count_id", &unvoted).await;
    ensure_index(db, "idx_contributor_last_activity_date", &last_active).await;
    ensure_index(db, "idx_vote_recipient_created", &vote_recipient).await;

    Ok(())
}

async fn ensure_index(db: &DatabaseConnection, name: &str, stmt: &IndexCreateStatement) {
    match db
        .execute_unprepared(&stmt.to_string(PostgresQueryBuilder))
        .await
    {
        Ok(_) => info!("Ensured index {name} exists"),
        Err(e) => warn!("Failed to create index {name}: {e}"),
    }
}
