use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::instrument;

use crate::entity::{activity, contributor, vote};
use crate::error::AppError;
use crate::models::contributor::{
    ActivitySummary, ContributorListResponse, ContributorReportResponse, ContributorResponse,
    LeaderboardQuery, VoteSummary,
};
use crate::state::AppState;
use crate::sync::{KIND_COMMENT, KIND_NOTE, KIND_PHOTO, KIND_TAG};

/// Recent rows considered per section of a contributor report.
const REPORT_LIMIT: u64 = 50;

/// List contributors, most recently active first.
#[instrument(skip(state))]
pub async fn list_contributors(
    State(state): State<AppState>,
) -> Result<Json<ContributorListResponse>, AppError> {
    let rows = contributor::Entity::find()
        .order_by_desc(contributor::Column::LastActivityDate)
        .limit(state.config.source.fetch_limit)
        .all(&state.db)
        .await?;

    let data: Vec<ContributorResponse> = rows.into_iter().map(ContributorResponse::from).collect();
    Ok(Json(ContributorListResponse {
        count: data.len(),
        data,
    }))
}

/// Contributors ranked by vote score.
#[instrument(skip(state, query))]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ContributorListResponse>, AppError> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);

    let rows = contributor::Entity::find()
        .order_by_desc(contributor::Column::VoteSum)
        .order_by_desc(contributor::Column::VoteCount)
        .limit(limit)
        .all(&state.db)
        .await?;

    let data: Vec<ContributorResponse> = rows.into_iter().map(ContributorResponse::from).collect();
    Ok(Json(ContributorListResponse {
        count: data.len(),
        data,
    }))
}

/// Full report for one author: ledger row, recent contributions split
/// by kind, and votes recently received.
#[instrument(skip(state), fields(author = %author))]
pub async fn get_contributor(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> Result<Json<ContributorReportResponse>, AppError> {
    let row = contributor::Entity::find()
        .filter(contributor::Column::Author.eq(author.as_str()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Contributor '{author}' not found")))?;

    let recent = activity::Entity::find()
        .filter(activity::Column::Author.eq(author.as_str()))
        .order_by_desc(activity::Column::Id)
        .limit(REPORT_LIMIT)
        .all(&state.db)
        .await?;

    let mut photos = Vec::new();
    let mut tags = Vec::new();
    let mut notes = Vec::new();
    let mut comments = Vec::new();
    for a in recent {
        let bucket = match a.kind.as_str() {
            KIND_PHOTO => &mut photos,
            KIND_TAG => &mut tags,
            KIND_NOTE => &mut notes,
            KIND_COMMENT => &mut comments,
            _ => continue,
        };
        bucket.push(ActivitySummary::from(a));
    }

    let votes_received = vote::Entity::find()
        .filter(vote::Column::Recipient.eq(author.as_str()))
        .order_by_desc(vote::Column::CreatedAt)
        .limit(REPORT_LIMIT)
        .all(&state.db)
        .await?
        .into_iter()
        .map(VoteSummary::from)
        .collect();

    Ok(Json(ContributorReportResponse {
        contributor: ContributorResponse::from(row),
        photos,
        tags,
        notes,
        comments,
        votes_received,
    }))
}
