use crate::dto::token_dto::MessageDto;
use crate::dto::user_dto::{BanUserDto, ChangeRoleDto, UpdateAboutDto, UserReadDto};
use crate::entity::user::{Role, User};
use crate::error::request_error::ValidatedRequest;
use crate::error::ApiError;
use crate::response::app_response::SuccessResponse;
use crate::service::auth_service::AuthService;
use crate::state::user_state::UserState;
use axum::extract::State;
use axum::{Extension, Json};
use tracing::warn;

/// A user counts as online while their access token is whitelisted.
pub async fn profile(
    State(state): State<UserState>,
    Extension(current_user): Extension<User>,
) -> Result<Json<SuccessResponse<UserReadDto>>, ApiError> {
    let is_online = state
        .sessions
        .get(current_user.id)
        .await
        .map(|entry| entry.is_some())
        .unwrap_or(false);

    Ok(Json(SuccessResponse::send(UserReadDto::from_user(current_user, is_online))))
}

pub async fn update_about(
    State(state): State<UserState>,
    Extension(current_user): Extension<User>,
    ValidatedRequest(payload): ValidatedRequest<UpdateAboutDto>,
) -> Result<Json<SuccessResponse<UserReadDto>>, ApiError> {
    let updated = state.user_service.update_about(&current_user, &payload.about).await?;
    Ok(Json(SuccessResponse::send(updated)))
}

pub async fn delete_about(
    State(state): State<UserState>,
    Extension(current_user): Extension<User>,
) -> Result<Json<MessageDto>, ApiError> {
    state.user_service.clear_about(&current_user).await?;
    Ok(Json(MessageDto::new("About section removed.")))
}

/// Moderators and admins flip the banned flag on the named account.
pub async fn ban_user(
    State(state): State<UserState>,
    Extension(current_user): Extension<User>,
    ValidatedRequest(payload): ValidatedRequest<BanUserDto>,
) -> Result<Json<MessageDto>, ApiError> {
    AuthService::check_admin(&current_user, &[Role::Admin, Role::Moderator])?;

    if !payload.confirmation {
        return Ok(Json(MessageDto::new("Ban not confirmed.")));
    }

    let target = state.user_service.find_by_name(&payload.username).await?;
    let banned = state.user_service.ban_toggle(&target).await?;

    warn!(
        "User ID: {} {} user ID: {}",
        current_user.id,
        if banned { "banned" } else { "unbanned" },
        target.id
    );

    let verb = if banned { "banned" } else { "unbanned" };
    Ok(Json(MessageDto::new(format!("User {} {}.", target.name, verb))))
}

/// Admin only.
pub async fn change_role(
    State(state): State<UserState>,
    Extension(current_user): Extension<User>,
    ValidatedRequest(payload): ValidatedRequest<ChangeRoleDto>,
) -> Result<Json<MessageDto>, ApiError> {
    AuthService::check_admin(&current_user, &[Role::Admin])?;

    let target = state.user_service.find_by_name(&payload.username).await?;
    let role = state.user_service.change_role(&target, &payload.role).await?;

    Ok(Json(MessageDto::new(format!("Role of {} changed to {}.", target.name, role))))
}
