use axum::Json;
use axum::extract::{Path, State};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};
use tracing::instrument;

use crate::entity::photo;
use crate::error::AppError;
use crate::models::photo::{DiscoverResponse, PhotoListResponse, PhotoResponse};
use crate::models::sync::SyncPhotoResponse;
use crate::state::AppState;
use crate::sync;

/// List tracked photos, most recently modified first, bounded by the
/// configured fetch limit.
#[instrument(skip(state))]
pub async fn list_photos(State(state): State<AppState>) -> Result<Json<PhotoListResponse>, AppError> {
    let photos = photo::Entity::find()
        .order_by_desc(photo::Column::LastModified)
        .limit(state.config.source.fetch_limit)
        .all(&state.db)
        .await?;

    let data: Vec<PhotoResponse> = photos.into_iter().map(PhotoResponse::from).collect();
    Ok(Json(PhotoListResponse {
        count: data.len(),
        data,
    }))
}

/// Scan the remote group listing and register unseen photos.
#[instrument(skip(state))]
pub async fn discover_photos(
    State(state): State<AppState>,
) -> Result<Json<DiscoverResponse>, AppError> {
    let new_photo_uids = sync::discover_photos(&state.db, state.source.as_ref()).await?;
    Ok(Json(DiscoverResponse { new_photo_uids }))
}

/// Refresh one photo's remote activity inline.
#[instrument(skip(state), fields(photo_uid = %uid))]
pub async fn sync_photo(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<SyncPhotoResponse>, AppError> {
    let new_activity_ids = sync::sync_photo(&state.db, state.source.as_ref(), &uid).await?;
    Ok(Json(SyncPhotoResponse {
        photo_uid: uid,
        new_activity_ids,
    }))
}
