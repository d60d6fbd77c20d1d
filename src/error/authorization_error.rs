use crate::response::app_response::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Role/ownership check failure. The message is fixed and never names the
/// required role.
#[derive(Error, Debug, PartialEq)]
pub enum AuthorizationError {
    #[error("Access denied")]
    AccessDenied,
}

impl IntoResponse for AuthorizationError {
    fn into_response(self) -> Response {
        ErrorResponse::send(self.to_string())
            .with_status(StatusCode::FORBIDDEN)
            .into_response()
    }
}
