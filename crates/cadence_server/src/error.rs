//! HTTP error surface.
//!
//! # Responsibility
//! - Map core repository errors onto HTTP status codes.
//! - Keep persistence details out of response bodies.
//!
//! # Invariants
//! - Internal failures return a generic body; the detail goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cadence_core::{HabitId, RepoError};
use chrono::NaiveDate;
use log::error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("habit {0} not found")]
    HabitNotFound(HabitId),

    #[error("habit {habit_id} is not scheduled on {date}")]
    NotScheduled { habit_id: HabitId, date: NaiveDate },

    #[error("internal error")]
    Internal(String),
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Validation(inner) => Self::InvalidRequest(inner.to_string()),
            RepoError::HabitNotFound(id) => Self::HabitNotFound(id),
            RepoError::NotScheduled { habit_id, date } => Self::NotScheduled { habit_id, date },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::HabitNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotScheduled { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(detail) => {
                error!("event=api_error module=server status=error detail={detail}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn repo_errors_map_to_expected_variants() {
        let id = Uuid::new_v4();

        let not_found = ApiError::from(RepoError::HabitNotFound(id));
        assert!(matches!(not_found, ApiError::HabitNotFound(found) if found == id));

        let invalid = ApiError::from(RepoError::InvalidData("bad row".to_string()));
        assert!(matches!(invalid, ApiError::Internal(_)));
    }
}
