use axum::http::StatusCode;
use thiserror::Error;

/// Failure values shared by every use case: expected failures become typed
/// variants the HTTP layer maps to statuses, never panics.
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Invalid input data: {0}")]
    InvalidInput(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;
