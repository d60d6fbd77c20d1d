use serde::{Deserialize, Serialize};
use validator::Validate;

/// Claim distinguishing the three token kinds signed with the shared secret.
/// Checked on every decode; an access token presented where a refresh token
/// is expected must fail regardless of signature validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    AccessToken,
    RefreshToken,
    EmailToken,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenClaimsDto {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub scope: TokenScope,
}

/// Response body for login and refresh; `token_type` is always "bearer".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPairDto {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RequestEmailDto {
    #[validate(email(message = "Email format is invalid"))]
    pub email: String,
}
