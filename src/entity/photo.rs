use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Deserialize, Serialize, sqlx::FromRow)]
pub struct Photo {
    pub id: i64,
    pub image_url: String,
    pub description: Option<String>,
    pub public_id: Option<String>,
    pub user_id: i64,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
