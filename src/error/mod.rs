pub(crate) mod authorization_error;
pub(crate) mod db_error;
pub(crate) mod photo_error;
pub(crate) mod request_error;
pub(crate) mod token_error;
pub(crate) mod user_error;

use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Unified application error type. Each domain error already knows how to
/// render itself; this just fans out.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Token(#[from] token_error::TokenError),
    #[error(transparent)]
    User(#[from] user_error::UserError),
    #[error(transparent)]
    Authorization(#[from] authorization_error::AuthorizationError),
    #[error(transparent)]
    Db(#[from] db_error::DbError),
    #[error(transparent)]
    Photo(#[from] photo_error::PhotoError),
    #[error(transparent)]
    Request(#[from] request_error::RequestError),
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => ApiError::User(user_error::UserError::UserNotFound),
            e => ApiError::Db(db_error::DbError::SomethingWentWrong(e.to_string())),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Token(error) => error.into_response(),
            ApiError::User(error) => error.into_response(),
            ApiError::Authorization(error) => error.into_response(),
            ApiError::Db(error) => error.into_response(),
            ApiError::Photo(error) => error.into_response(),
            ApiError::Request(error) => error.into_response(),
        }
    }
}
