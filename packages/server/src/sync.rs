use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::entity::{activity, photo};
use crate::ledger;
use crate::source::{PhotoSource, RemoteEvent, RevisionMarker, SourceError};

pub const KIND_PHOTO: &str = "photo";
pub const KIND_TAG: &str = "tag";
pub const KIND_NOTE: &str = "note";
pub const KIND_COMMENT: &str = "comment";

/// Content stored for the synthetic "photo added" activity.
const PHOTO_ADDED_CONTENT: &str = "added photo";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("photo '{0}' is not tracked")]
    PhotoNotFound(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Outcome of one batch sync round.
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    /// Photos that produced new activity, with the new activity ids.
    pub updated: Vec<PhotoUpdate>,
    /// Photos whose remote state was unchanged (or unavailable).
    pub unchanged: usize,
    /// Photos whose sync failed; one failure never aborts the batch.
    pub failed: Vec<PhotoFailure>,
}

#[derive(Debug, Serialize)]
pub struct PhotoUpdate {
    pub photo_uid: String,
    pub new_activity_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PhotoFailure {
    pub photo_uid: String,
    pub error: String,
}

/// Scan the group listing and register photos we have not seen before.
///
/// Each new photo gets a synthetic "photo added" activity whose
/// activity_id is the photo's own uid, so the event can never be
/// recorded twice across repeated discovery rounds. Returns the uids
/// of newly registered photos; an empty listing round is not an error.
pub async fn discover_photos<C: ConnectionTrait>(
    db: &C,
    source: &dyn PhotoSource,
) -> Result<Vec<String>, SyncError> {
    let stubs = match source.fetch_group_listing().await {
        Ok(stubs) => stubs,
        Err(SourceError::Unavailable(reason)) => {
            warn!(%reason, "Group listing unavailable, skipping discovery round");
            return Ok(vec![]);
        }
        Err(e) => return Err(e.into()),
    };

    let mut new_uids = Vec::new();
    for stub in stubs {
        let uid = stub.uid.clone();
        let owner_id = stub.owner_id.clone();

        let now = Utc::now();
        let model = photo::ActiveModel {
            uid: Set(stub.uid),
            title: Set(stub.title),
            owner_id: Set(stub.owner_id),
            owner_name: Set(stub.owner_name),
            page_url: Set(stub.page_url),
            image_url: Set(stub.image_url),
            thumb_url: Set(stub.thumb_url),
            // We don't know the remote revision yet; the first
            // activity sync will fill it in.
            last_modified: Set(RevisionMarker::ZERO.as_i64()),
            created_at: Set(now),
            ..Default::default()
        };
        // Conflict-ignoring insert: two overlapping discovery rounds
        // may both try to register a uid, and only one may win.
        let inserted = photo::Entity::insert(model)
            .on_conflict(
                OnConflict::column(photo::Column::Uid)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;
        let created = match inserted {
            Ok(rows) => rows > 0,
            Err(DbErr::RecordNotInserted) => false,
            Err(e) => return Err(e.into()),
        };
        if !created {
            continue;
        }

        record_activity(db, &uid, &uid, &owner_id, PHOTO_ADDED_CONTENT, KIND_PHOTO).await?;

        new_uids.push(uid);
    }

    if !new_uids.is_empty() {
        info!(count = new_uids.len(), "Registered new photos");
    }
    Ok(new_uids)
}

/// Synchronize one photo's remote activity into the local log.
///
/// Returns the ids of newly created activities; empty when the remote
/// revision marker has not advanced or the source is unavailable.
pub async fn sync_photo<C: ConnectionTrait>(
    db: &C,
    source: &dyn PhotoSource,
    uid: &str,
) -> Result<Vec<String>, SyncError> {
    let stored = photo::Entity::find()
        .filter(photo::Column::Uid.eq(uid))
        .one(db)
        .await?
        .ok_or_else(|| SyncError::PhotoNotFound(uid.to_string()))?;

    let info = match source.fetch_photo_info(uid).await {
        Ok(info) => info,
        Err(SourceError::Unavailable(reason)) => {
            warn!(photo_uid = uid, %reason, "Photo info unavailable, no data this round");
            return Ok(vec![]);
        }
        Err(e) => return Err(e.into()),
    };

    if info.last_modified <= RevisionMarker(stored.last_modified) {
        return Ok(vec![]);
    }

    // Persist the new marker before extracting events. Trade-off: a
    // failure between this write and the extraction below silently
    // drops this round's events, in exchange for never reprocessing a
    // stale payload on retry. Callers needing no-loss semantics must
    // reorder these steps or wrap them in a transaction.
    photo::Entity::update_many()
        .col_expr(
            photo::Column::LastModified,
            Expr::value(info.last_modified.as_i64()),
        )
        .filter(photo::Column::Uid.eq(uid))
        .exec(db)
        .await?;

    let mut new_ids = Vec::new();
    extract_events(db, uid, &info.tags, KIND_TAG, &mut new_ids).await?;
    extract_events(db, uid, &info.notes, KIND_NOTE, &mut new_ids).await?;

    match source.fetch_comments(uid).await {
        Ok(comments) => {
            extract_events(db, uid, &comments, KIND_COMMENT, &mut new_ids).await?;
        }
        Err(SourceError::Unavailable(reason)) => {
            warn!(photo_uid = uid, %reason, "Comments unavailable, skipping this round");
        }
        Err(e) => return Err(e.into()),
    }

    if !new_ids.is_empty() {
        info!(photo_uid = uid, count = new_ids.len(), "Recorded new activity");
    }
    Ok(new_ids)
}

/// Run the per-photo sync across the tracked photos, most recently
/// modified first, bounded by `fetch_limit`. One photo's failure is
/// reported in the result and never aborts the rest of the batch.
pub async fn sync_all<C: ConnectionTrait>(
    db: &C,
    source: &dyn PhotoSource,
    fetch_limit: u64,
) -> Result<SyncReport, DbErr> {
    let photos = photo::Entity::find()
        .order_by_desc(photo::Column::LastModified)
        .limit(fetch_limit)
        .all(db)
        .await?;

    let mut report = SyncReport::default();
    for p in photos {
        match sync_photo(db, source, &p.uid).await {
            Ok(ids) if ids.is_empty() => report.unchanged += 1,
            Ok(ids) => report.updated.push(PhotoUpdate {
                photo_uid: p.uid,
                new_activity_ids: ids,
            }),
            Err(e) => {
                warn!(photo_uid = %p.uid, error = %e, "Photo sync failed, continuing batch");
                report.failed.push(PhotoFailure {
                    photo_uid: p.uid,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        updated = report.updated.len(),
        unchanged = report.unchanged,
        failed = report.failed.len(),
        "Batch sync finished"
    );
    Ok(report)
}

async fn extract_events<C: ConnectionTrait>(
    db: &C,
    photo_uid: &str,
    events: &[RemoteEvent],
    kind: &str,
    new_ids: &mut Vec<String>,
) -> Result<(), SyncError> {
    for event in events {
        if record_activity(db, &event.id, photo_uid, &event.author, &event.text, kind).await? {
            new_ids.push(event.id.clone());
        }
    }
    Ok(())
}

/// Create an activity unless one with this activity_id already exists,
/// stamping the contributor ledger on creation. Returns whether a row
/// was created. Uniqueness of activity_id is the sole dedup mechanism;
/// the conflict-ignoring insert keeps concurrent syncs of the same
/// photo from erroring on the duplicate.
pub async fn record_activity<C: ConnectionTrait>(
    db: &C,
    activity_id: &str,
    photo_uid: &str,
    author: &str,
    content: &str,
    kind: &str,
) -> Result<bool, DbErr> {
    let now = Utc::now();
    let model = activity::ActiveModel {
        activity_id: Set(activity_id.to_string()),
        photo_uid: Set(photo_uid.to_string()),
        author: Set(author.to_string()),
        kind: Set(kind.to_string()),
        content: Set(content.to_string()),
        vote_sum: Set(0),
        vote_count: Set(0),
        created_at: Set(now),
        ..Default::default()
    };

    let result = activity::Entity::insert(model)
        .on_conflict(
            OnConflict::column(activity::Column::ActivityId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    let created = match result {
        Ok(rows) => rows > 0,
        Err(DbErr::RecordNotInserted) => false,
        Err(e) => return Err(e),
    };

    if created {
        ledger::stamp_contributor(db, author, activity_id, now).await?;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use super::*;
    use crate::source::{PhotoInfo, PhotoStub};

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    /// Source stub returning a fixed marker and a fixed tag list.
    struct StaticSource {
        marker: i64,
        tags: Vec<RemoteEvent>,
    }

    #[async_trait]
    impl PhotoSource for StaticSource {
        async fn fetch_group_listing(&self) -> Result<Vec<PhotoStub>, SourceError> {
            Ok(vec![])
        }

        async fn fetch_photo_info(&self, _uid: &str) -> Result<PhotoInfo, SourceError> {
            Ok(PhotoInfo {
                last_modified: RevisionMarker(self.marker),
                tags: self.tags.clone(),
                notes: vec![],
            })
        }

        async fn fetch_comments(&self, _uid: &str) -> Result<Vec<RemoteEvent>, SourceError> {
            Ok(vec![])
        }
    }

    /// Source stub whose every call fails soft.
    struct DownSource;

    #[async_trait]
    impl PhotoSource for DownSource {
        async fn fetch_group_listing(&self) -> Result<Vec<PhotoStub>, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }

        async fn fetch_photo_info(&self, _uid: &str) -> Result<PhotoInfo, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }

        async fn fetch_comments(&self, _uid: &str) -> Result<Vec<RemoteEvent>, SourceError> {
            Err(SourceError::Unavailable("connection refused".into()))
        }
    }

    fn tracked_photo(last_modified: i64) -> photo::Model {
        photo::Model {
            id: 1,
            uid: "101".into(),
            title: "sunset".into(),
            owner_id: "11111@N00".into(),
            owner_name: "ana".into(),
            page_url: "https://www.flickr.com/photos/11111@N00/101".into(),
            image_url: "https://live.staticflickr.com/65535/101_abc_m.jpg".into(),
            thumb_url: "https://live.staticflickr.com/65535/101_abc_t.jpg".into(),
            last_modified,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn unchanged_marker_writes_nothing() {
        // Only the photo lookup hits the database; a marker write or
        // event insert would exhaust the mock and fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracked_photo(150)]])
            .into_connection();

        let source = StaticSource {
            marker: 150,
            tags: vec![],
        };
        let new_ids = sync_photo(&db, &source, "101").await.unwrap();
        assert!(new_ids.is_empty());
    }

    #[tokio::test]
    async fn stale_marker_is_ignored_too() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracked_photo(150)]])
            .into_connection();

        let source = StaticSource {
            marker: 99,
            tags: vec![],
        };
        let new_ids = sync_photo(&db, &source, "101").await.unwrap();
        assert!(new_ids.is_empty());
    }

    #[tokio::test]
    async fn advanced_marker_persists_and_records_events() {
        // Marker 100 -> 150 with two tags. The marker update, two
        // activity inserts, and two contributor stamps each consume one
        // exec result, in that order; a missing write would leave the
        // mock exhausted and fail the call.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracked_photo(100)]])
            .append_exec_results([exec(1), exec(1), exec(1), exec(1), exec(1)])
            .into_connection();

        let source = StaticSource {
            marker: 150,
            tags: vec![
                RemoteEvent {
                    id: "t1".into(),
                    author: "ana".into(),
                    text: "sunset".into(),
                },
                RemoteEvent {
                    id: "t2".into(),
                    author: "bo".into(),
                    text: "beach".into(),
                },
            ],
        };
        let new_ids = sync_photo(&db, &source, "101").await.unwrap();
        assert_eq!(new_ids, vec!["t1".to_string(), "t2".to_string()]);
    }

    #[tokio::test]
    async fn untracked_photo_is_an_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<photo::Model>::new()])
            .into_connection();

        let source = StaticSource {
            marker: 1,
            tags: vec![],
        };
        let result = sync_photo(&db, &source, "999").await;
        assert!(matches!(result, Err(SyncError::PhotoNotFound(uid)) if uid == "999"));
    }

    #[tokio::test]
    async fn unavailable_source_is_a_soft_miss() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![tracked_photo(150)]])
            .into_connection();

        let new_ids = sync_photo(&db, &DownSource, "101").await.unwrap();
        assert!(new_ids.is_empty());
    }

    #[tokio::test]
    async fn unavailable_listing_skips_discovery_round() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let new_uids = discover_photos(&db, &DownSource).await.unwrap();
        assert!(new_uids.is_empty());
    }

    #[tokio::test]
    async fn duplicate_activity_is_not_created_and_not_stamped() {
        // The conflict-ignoring insert reports RecordNotInserted; no
        // contributor stamp may follow.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_errors([DbErr::RecordNotInserted])
            .into_connection();

        let created = record_activity(&db, "t1", "101", "ana", "sunset", KIND_TAG)
            .await
            .unwrap();
        assert!(!created);
    }
}
