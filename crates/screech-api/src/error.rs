use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use screech_db::is_unique_violation;

/// Failure kinds shared by every service call. Each one maps to a bare
/// status code; no body is sent.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input")]
    InvalidInput,

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    /// Classify a failed write: unique-constraint violations become `Conflict`.
    pub fn from_write(err: anyhow::Error) -> Self {
        if is_unique_violation(&err) {
            Self::Conflict
        } else {
            Self::Storage(err)
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Storage(e) = &self {
            error!("Storage error: {:#}", e);
        }
        self.status().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(ApiError::InvalidInput.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Storage(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn non_constraint_write_failure_is_storage() {
        let err = ApiError::from_write(anyhow::anyhow!("disk full"));
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
