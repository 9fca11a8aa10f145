use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::json::AppJson;
use crate::models::vote::{VoteRequest, VoteResponse, validate_vote};
use crate::state::AppState;
use crate::votes;

/// Cast a vote on an activity.
#[instrument(skip(state, payload), fields(activity_id = %activity_id))]
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(activity_id): Path<String>,
    AppJson(payload): AppJson<VoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_vote(&payload)?;

    let tally = votes::record_vote(
        &state.db,
        payload.recipient.trim(),
        &activity_id,
        payload.value,
        payload.voter.trim(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(VoteResponse {
            activity_id,
            vote_count: tally.vote_count,
            vote_sum: tally.vote_sum,
        }),
    ))
}
