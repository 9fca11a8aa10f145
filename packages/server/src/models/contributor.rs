use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{activity, contributor, vote};

#[derive(Debug, Serialize)]
pub struct ContributorResponse {
    pub author: String,
    pub last_activity_date: DateTime<Utc>,
    pub last_activity_id: String,
    pub vote_sum: i32,
    pub vote_count: i32,
}

impl From<contributor::Model> for ContributorResponse {
    fn from(m: contributor::Model) -> Self {
        Self {
            author: m.author,
            last_activity_date: m.last_activity_date,
            last_activity_id: m.last_activity_id,
            vote_sum: m.vote_sum,
            vote_count: m.vote_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContributorListResponse {
    pub count: usize,
    pub data: Vec<ContributorResponse>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<u64>,
}

/// Compact activity line inside a contributor report.
#[derive(Debug, Serialize)]
pub struct ActivitySummary {
    pub activity_id: String,
    pub photo_uid: String,
    pub content: String,
    pub vote_sum: i32,
    pub vote_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<activity::Model> for ActivitySummary {
    fn from(m: activity::Model) -> Self {
        Self {
            activity_id: m.activity_id,
            photo_uid: m.photo_uid,
            content: m.content,
            vote_sum: m.vote_sum,
            vote_count: m.vote_count,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VoteSummary {
    pub voter: String,
    pub value: i32,
    pub activity_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<vote::Model> for VoteSummary {
    fn from(m: vote::Model) -> Self {
        Self {
            voter: m.voter,
            value: m.value,
            activity_id: m.activity_id,
            created_at: m.created_at,
        }
    }
}

/// Full per-author report: ledger row, recent contributions split by
/// kind, and the votes recently received.
#[derive(Debug, Serialize)]
pub struct ContributorReportResponse {
    #[serde(flatten)]
    pub contributor: ContributorResponse,
    pub photos: Vec<ActivitySummary>,
    pub tags: Vec<ActivitySummary>,
    pub notes: Vec<ActivitySummary>,
    pub comments: Vec<ActivitySummary>,
    pub votes_received: Vec<VoteSummary>,
}
