use crate::dto::token_dto::{MessageDto, RequestEmailDto, TokenPairDto, TokenScope};
use crate::dto::user_dto::{UserCreationRespDto, UserLoginDto, UserReadDto, UserRegisterDto};
use crate::entity::user::User;
use crate::error::request_error::{ValidatedForm, ValidatedRequest};
use crate::error::user_error::UserError;
use crate::error::ApiError;
use crate::middleware::auth::bearer_token;
use crate::service::token_service::TokenServiceTrait;
use crate::state::auth_state::AuthState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::{Extension, Json};
use tracing::info;

pub async fn register(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<UserRegisterDto>,
) -> Result<(StatusCode, Json<UserCreationRespDto>), ApiError> {
    let user = state.user_service.create_user(payload).await?;

    let email_token = state
        .token_service
        .issue(&user.email, TokenScope::EmailToken, None)?;
    state
        .mailer
        .send_verification_in_background(user.email.clone(), user.name.clone(), email_token);

    let body = UserCreationRespDto {
        user: UserReadDto::from_user(user, false),
        detail: "User successfully created. Check your email for confirmation.".to_string(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// OAuth2 password flow: credentials arrive form-encoded, with the email in
/// the `username` field.
pub async fn login(
    State(state): State<AuthState>,
    ValidatedForm(payload): ValidatedForm<UserLoginDto>,
) -> Result<Json<TokenPairDto>, ApiError> {
    let pair = state.auth_service.login(&payload.username, &payload.password).await?;
    Ok(Json(pair))
}

/// Rotates the pair presented as a bearer refresh token. A replayed token
/// clears the stored one and forces a fresh login.
pub async fn refresh_token(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<TokenPairDto>, ApiError> {
    let token = bearer_token(&headers)?;
    let pair = state.auth_service.refresh(token).await?;
    Ok(Json(pair))
}

pub async fn logout(
    State(state): State<AuthState>,
    Extension(current_user): Extension<User>,
) -> Result<Json<MessageDto>, ApiError> {
    state.auth_service.logout(&current_user).await?;
    Ok(Json(MessageDto::new("Successfully logged out.")))
}

/// Confirmation link target. Idempotent: a second visit reports the account
/// is already confirmed instead of failing.
pub async fn confirmed_email(
    State(state): State<AuthState>,
    Path(token): Path<String>,
) -> Result<Json<MessageDto>, ApiError> {
    let claims = state
        .token_service
        .decode(&token, TokenScope::EmailToken)
        .map_err(|_| UserError::VerificationError)?;

    let user = state
        .user_service
        .find_by_email(&claims.sub)
        .await
        .ok_or(UserError::VerificationError)?;

    if user.is_active {
        return Ok(Json(MessageDto::new("Your email is already confirmed")));
    }

    state.user_service.confirm_email(&user.email).await?;
    info!("Email confirmed for user ID: {}", user.id);
    Ok(Json(MessageDto::new("Email confirmed")))
}

/// Re-sends the confirmation mail. The response does not reveal whether the
/// address belongs to an account.
pub async fn request_email(
    State(state): State<AuthState>,
    ValidatedRequest(payload): ValidatedRequest<RequestEmailDto>,
) -> Result<Json<MessageDto>, ApiError> {
    if let Some(user) = state.user_service.find_by_email(&payload.email).await {
        if user.is_active {
            return Ok(Json(MessageDto::new("Your email is already confirmed")));
        }

        let email_token = state
            .token_service
            .issue(&user.email, TokenScope::EmailToken, None)?;
        state
            .mailer
            .send_verification_in_background(user.email, user.name, email_token);
    }

    Ok(Json(MessageDto::new("Check your email for confirmation.")))
}
