use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Token failures. Decode errors are distinct variants internally but
/// collapse to one generic message at the API boundary so a caller cannot
/// tell a forged token from an expired one.
#[derive(Error, Debug, PartialEq)]
pub enum TokenError {
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("Could not validate credentials")]
    TokenExpired,
    #[error("Could not validate credentials")]
    ScopeMismatch,
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid refresh token")]
    RefreshTokenMismatch,
    #[error("Token error: {0}")]
    TokenCreationError(String),
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status_code = match self {
            TokenError::InvalidToken => StatusCode::UNAUTHORIZED,
            TokenError::TokenExpired => StatusCode::UNAUTHORIZED,
            TokenError::ScopeMismatch => StatusCode::UNAUTHORIZED,
            TokenError::MissingToken => StatusCode::UNAUTHORIZED,
            TokenError::RefreshTokenMismatch => StatusCode::UNAUTHORIZED,
            TokenError::TokenCreationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
