use crate::entity::photo::Photo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
pub struct RatePhotoDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PhotoReadDto {
    pub id: i64,
    pub image_url: String,
    pub description: Option<String>,
    pub user_id: i64,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
}

impl PhotoReadDto {
    pub fn from(model: Photo) -> PhotoReadDto {
        Self {
            id: model.id,
            image_url: model.image_url,
            description: model.description,
            user_id: model.user_id,
            average_rating: model.average_rating,
            created_at: model.created_at,
        }
    }
}
