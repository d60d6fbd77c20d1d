use crate::error::{token_error::TokenError, ApiError};
use crate::state::token_state::TokenState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{http, http::Request, middleware::Next, response::IntoResponse};
use tracing::info;

/// Pulls the token out of `Authorization: Bearer <token>`. Shared by the
/// middleware and the refresh endpoint, which receives the refresh token the
/// same way.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(TokenError::MissingToken)
}

/// Resolves the bearer access token to a user and stores it in the request
/// extensions. Rejection reasons (bad signature, expiry, missing whitelist
/// entry) all surface as the same generic 401.
pub async fn auth(
    State(state): State<TokenState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let token = bearer_token(req.headers())?.to_string();

    let user = state.auth_service.resolve_current_user(&token).await?;
    info!("Authenticated request for user ID: {}", user.id);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), Err(TokenError::MissingToken));
    }

    #[test]
    fn test_wrong_scheme_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), Err(TokenError::MissingToken));
    }

    #[test]
    fn test_empty_token_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), Err(TokenError::MissingToken));
    }
}
