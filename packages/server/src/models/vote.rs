use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::shared::validate_author;

/// Body for casting a vote on an activity.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// Author credited with the vote (the activity's contributor).
    pub recipient: String,
    /// Handle of whoever is voting.
    pub voter: String,
    /// +1 or -1.
    pub value: i32,
}

pub fn validate_vote(payload: &VoteRequest) -> Result<(), AppError> {
    validate_author(&payload.recipient, "recipient")?;
    validate_author(&payload.voter, "voter")?;
    if payload.value != 1 && payload.value != -1 {
        return Err(AppError::Validation("value must be +1 or -1".into()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub activity_id: String,
    pub vote_count: i32,
    pub vote_sum: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: i32) -> VoteRequest {
        VoteRequest {
            recipient: "ana".into(),
            voter: "bo".into(),
            value,
        }
    }

    #[test]
    fn unit_values_pass() {
        assert!(validate_vote(&request(1)).is_ok());
        assert!(validate_vote(&request(-1)).is_ok());
    }

    #[test]
    fn other_values_fail() {
        for value in [0, 2, -2, 10] {
            assert!(validate_vote(&request(value)).is_err());
        }
    }

    #[test]
    fn blank_handles_fail() {
        let mut payload = request(1);
        payload.voter = "   ".into();
        assert!(validate_vote(&payload).is_err());
    }
}
