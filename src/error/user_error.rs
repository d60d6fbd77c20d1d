use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Account failures. The login path reports "Invalid data" for both an
/// unknown email and a wrong password so responses do not reveal which
/// detail was wrong; not-confirmed and banned are safe to report distinctly.
#[derive(Error, Debug, PartialEq)]
pub enum UserError {
    #[error("Invalid data")]
    UnknownAccount,
    #[error("Invalid data")]
    InvalidCredentials,
    #[error("User is not confirmed")]
    AccountNotConfirmed,
    #[error("User is banned")]
    AccountBanned,
    #[error("Account already exists")]
    UserAlreadyExists,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid role")]
    InvalidRole,
    #[error("Verification error")]
    VerificationError,
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status_code = match self {
            UserError::UnknownAccount => StatusCode::NOT_FOUND,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::AccountNotConfirmed => StatusCode::UNAUTHORIZED,
            UserError::AccountBanned => StatusCode::UNAUTHORIZED,
            UserError::UserAlreadyExists => StatusCode::CONFLICT,
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::InvalidRole => StatusCode::UNPROCESSABLE_ENTITY,
            UserError::VerificationError => StatusCode::BAD_REQUEST,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
