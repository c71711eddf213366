use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::application::usecases::errors::UseCaseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

/// Bridge between use case failures and HTTP responses. Internal errors
/// never leak detail to the client.
#[derive(Debug)]
pub struct ApiError(pub UseCaseError);

impl From<UseCaseError> for ApiError {
    fn from(err: UseCaseError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let message = match &self.0 {
            UseCaseError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// 403 for mutations that require a staff token.
pub fn forbidden() -> Response {
    let body = Json(ErrorResponse {
        code: StatusCode::FORBIDDEN.as_u16(),
        message: "Staff role required".to_string(),
    });
    (StatusCode::FORBIDDEN, body).into_response()
}
