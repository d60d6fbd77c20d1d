use crate::dto::photo_dto::{PhotoReadDto, RatePhotoDto};
use crate::entity::user::User;
use crate::error::photo_error::PhotoError;
use crate::error::request_error::ValidatedRequest;
use crate::error::ApiError;
use crate::repository::photo_repository::PhotoRepositoryTrait;
use crate::response::app_response::SuccessResponse;
use crate::state::photo_state::PhotoState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use tracing::info;

async fn find_photo(state: &PhotoState, photo_id: i64) -> Result<crate::entity::photo::Photo, ApiError> {
    state.photo_repo.find(photo_id).await.map_err(|e| match e {
        sqlx::Error::RowNotFound => ApiError::Photo(PhotoError::PhotoNotFound),
        e => e.into(),
    })
}

pub async fn get_photo(
    State(state): State<PhotoState>,
    Path(photo_id): Path<i64>,
) -> Result<Json<SuccessResponse<PhotoReadDto>>, ApiError> {
    let photo = find_photo(&state, photo_id).await?;
    Ok(Json(SuccessResponse::send(PhotoReadDto::from(photo))))
}

/// Rating the same photo twice replaces the previous score; the response
/// carries the recomputed average.
pub async fn rate_photo(
    State(state): State<PhotoState>,
    Extension(current_user): Extension<User>,
    Path(photo_id): Path<i64>,
    ValidatedRequest(payload): ValidatedRequest<RatePhotoDto>,
) -> Result<Json<SuccessResponse<PhotoReadDto>>, ApiError> {
    let mut photo = find_photo(&state, photo_id).await?;

    let average = state
        .photo_repo
        .rate(current_user.id, photo_id, payload.rating)
        .await?;
    photo.average_rating = average;

    info!("User ID: {} rated photo ID: {}", current_user.id, photo_id);
    Ok(Json(SuccessResponse::send(PhotoReadDto::from(photo))))
}

/// Removing a rating that was never given is a no-op; either way the stored
/// average reflects the remaining ratings, 0 when none are left.
pub async fn delete_rating(
    State(state): State<PhotoState>,
    Extension(current_user): Extension<User>,
    Path(photo_id): Path<i64>,
) -> Result<Json<SuccessResponse<PhotoReadDto>>, ApiError> {
    let mut photo = find_photo(&state, photo_id).await?;

    let average = state.photo_repo.remove_rating(current_user.id, photo_id).await?;
    photo.average_rating = average;

    Ok(Json(SuccessResponse::send(PhotoReadDto::from(photo))))
}
