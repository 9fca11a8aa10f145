use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Select};
use tracing::instrument;

use crate::entity::{activity, photo};
use crate::error::AppError;
use crate::models::activity::{ActivityItem, ActivityPageResponse};
use crate::models::shared::CursorQuery;
use crate::pagination::{self, PageRequest};
use crate::state::AppState;

/// Resolve one page of a (possibly filtered) activity selection into
/// response items, batch-loading the photos the page references.
async fn build_activity_page(
    db: &DatabaseConnection,
    base: Select<activity::Entity>,
    request: PageRequest,
    page_size: u64,
) -> Result<ActivityPageResponse, AppError> {
    let page = pagination::fetch_page(db, base, request, page_size).await?;

    let photo_uids: Vec<String> = page.items.iter().map(|a| a.photo_uid.clone()).collect();
    let photos: HashMap<String, photo::Model> = if photo_uids.is_empty() {
        HashMap::new()
    } else {
        photo::Entity::find()
            .filter(photo::Column::Uid.is_in(photo_uids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.uid.clone(), p))
            .collect()
    };

    let data: Vec<ActivityItem> = page
        .items
        .into_iter()
        .map(|a| {
            let photo = photos.get(&a.photo_uid);
            ActivityItem::from_parts(a, photo)
        })
        .collect();

    Ok(ActivityPageResponse {
        count: data.len(),
        data,
        next_cursor: page.next_cursor,
        previous_cursor: page.previous_cursor,
    })
}

/// One page of the full activity log.
#[instrument(skip(state, query))]
pub async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<CursorQuery>,
) -> Result<Json<ActivityPageResponse>, AppError> {
    let request = query.to_page_request()?;
    let response = build_activity_page(
        &state.db,
        activity::Entity::find(),
        request,
        state.config.source.page_size,
    )
    .await?;
    Ok(Json(response))
}

/// One page of activities nobody has voted on yet.
#[instrument(skip(state, query))]
pub async fn list_unvoted_activities(
    State(state): State<AppState>,
    Query(query): Query<CursorQuery>,
) -> Result<Json<ActivityPageResponse>, AppError> {
    let request = query.to_page_request()?;
    let base = activity::Entity::find().filter(activity::Column::VoteCount.eq(0));
    let response =
        build_activity_page(&state.db, base, request, state.config.source.page_size).await?;
    Ok(Json(response))
}

/// One page of a single photo's activity.
#[instrument(skip(state, query), fields(photo_uid = %uid))]
pub async fn list_photo_activities(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(query): Query<CursorQuery>,
) -> Result<Json<ActivityPageResponse>, AppError> {
    let tracked = photo::Entity::find()
        .filter(photo::Column::Uid.eq(uid.as_str()))
        .one(&state.db)
        .await?;
    if tracked.is_none() {
        return Err(AppError::NotFound(format!("Photo '{uid}' is not tracked")));
    }

    let request = query.to_page_request()?;
    let base = activity::Entity::find().filter(activity::Column::PhotoUid.eq(uid.as_str()));
    let response =
        build_activity_page(&state.db, base, request, state.config.source.page_size).await?;
    Ok(Json(response))
}
