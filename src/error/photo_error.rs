use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PhotoError {
    #[error("Photo not found")]
    PhotoNotFound,
}

impl IntoResponse for PhotoError {
    fn into_response(self) -> Response {
        let status_code = match self {
            PhotoError::PhotoNotFound => StatusCode::NOT_FOUND,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
