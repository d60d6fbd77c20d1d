use crate::config::database::{Database, DatabaseTrait};
use crate::entity::photo::Photo;
use async_trait::async_trait;
use sqlx::Error;
use std::sync::Arc;

const PHOTO_COLUMNS: &str =
    "id, image_url, description, public_id, user_id, average_rating, created_at, updated_at";

/// Mean of the ratings, 0 when there are none.
pub(crate) fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64
}

#[derive(Clone)]
pub struct PhotoRepository {
    db_conn: Arc<Database>,
}

impl PhotoRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
pub trait PhotoRepositoryTrait: Send + Sync {
    async fn find(&self, id: i64) -> Result<Photo, Error>;
    /// Upsert the (user, photo) rating and recompute the photo's average in
    /// one transaction, so readers never observe a half-applied update.
    /// Concurrent raters on the same photo may still last-write-win on the
    /// stored average.
    async fn rate(&self, user_id: i64, photo_id: i64, rating: i32) -> Result<f64, Error>;
    async fn remove_rating(&self, user_id: i64, photo_id: i64) -> Result<f64, Error>;
}

#[async_trait]
impl PhotoRepositoryTrait for PhotoRepository {
    async fn find(&self, id: i64) -> Result<Photo, Error> {
        let query = format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1");
        sqlx::query_as::<_, Photo>(&query)
            .bind(id)
            .fetch_one(self.db_conn.get_pool())
            .await
    }

    async fn rate(&self, user_id: i64, photo_id: i64, rating: i32) -> Result<f64, Error> {
        let mut tx = self.db_conn.get_pool().begin().await?;

        sqlx::query(
            "INSERT INTO photo_ratings (user_id, photo_id, rating) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, photo_id) DO UPDATE SET rating = EXCLUDED.rating",
        )
        .bind(user_id)
        .bind(photo_id)
        .bind(rating)
        .execute(&mut *tx)
        .await?;

        let ratings: Vec<i32> =
            sqlx::query_scalar("SELECT rating FROM photo_ratings WHERE photo_id = $1")
                .bind(photo_id)
                .fetch_all(&mut *tx)
                .await?;
        let average = average_rating(&ratings);

        sqlx::query("UPDATE photos SET average_rating = $1, updated_at = NOW() WHERE id = $2")
            .bind(average)
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(average)
    }

    async fn remove_rating(&self, user_id: i64, photo_id: i64) -> Result<f64, Error> {
        let mut tx = self.db_conn.get_pool().begin().await?;

        sqlx::query("DELETE FROM photo_ratings WHERE user_id = $1 AND photo_id = $2")
            .bind(user_id)
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        let ratings: Vec<i32> =
            sqlx::query_scalar("SELECT rating FROM photo_ratings WHERE photo_id = $1")
                .bind(photo_id)
                .fetch_all(&mut *tx)
                .await?;
        let average = average_rating(&ratings);

        sqlx::query("UPDATE photos SET average_rating = $1, updated_at = NOW() WHERE id = $2")
            .bind(average)
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_two_ratings() {
        assert_eq!(average_rating(&[3, 5]), 4.0);
    }

    #[test]
    fn test_average_resets_to_zero_when_empty() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn test_average_single_rating() {
        assert_eq!(average_rating(&[1]), 1.0);
        assert_eq!(average_rating(&[5]), 5.0);
    }

    #[test]
    fn test_average_fractional() {
        assert_eq!(average_rating(&[1, 2]), 1.5);
        assert_eq!(average_rating(&[2, 3, 5]), 10.0 / 3.0);
    }
}
