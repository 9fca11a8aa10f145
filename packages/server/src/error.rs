use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::source::SourceError;
use crate::sync::SyncError;
use crate::votes::VoteError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `NOT_FOUND`, `SOURCE_ERROR`, `QUEUE_DISABLED`, `INTERNAL_ERROR`.
    pub code: &'static str,
    /// Human-readable error description.
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    /// The remote source returned a payload we could not interpret.
    Source(String),
    /// An enqueue was requested while MQ is disabled.
    QueueDisabled,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::Source(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "SOURCE_ERROR",
                    message: msg,
                },
            ),
            AppError::QueueDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    code: "QUEUE_DISABLED",
                    message: "Message queue is disabled in configuration".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::PhotoNotFound(uid) => {
                AppError::NotFound(format!("Photo '{uid}' is not tracked"))
            }
            SyncError::Source(e) => AppError::Source(e.to_string()),
            SyncError::Db(e) => e.into(),
        }
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::Source(err.to_string())
    }
}

impl From<VoteError> for AppError {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::ActivityNotFound(id) => {
                AppError::NotFound(format!("Activity '{id}' not found"))
            }
            VoteError::Db(e) => e.into(),
        }
    }
}
