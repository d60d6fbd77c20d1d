use crate::config::database::{Database, DatabaseTrait};
use crate::config::logging::secure_log;
use crate::entity::user::{Role, User};
use async_trait::async_trait;
use sqlx::Error;
use std::sync::Arc;

const USER_COLUMNS: &str =
    "id, name, email, password, role, is_active, banned, refresh_token, about, created_at, modified";

#[derive(Clone)]
pub struct UserRepository {
    db_conn: Arc<Database>,
}

impl UserRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

/// Seam between the services and the credential store; the in-memory test
/// double in `auth_service.rs` implements it too.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Option<User>;
    async fn find_by_name(&self, name: &str) -> Option<User>;
    async fn find(&self, id: i64) -> Result<User, Error>;
    async fn count(&self) -> Result<i64, Error>;
    async fn create(&self, name: &str, email: &str, password_hash: &str, role: Role) -> Result<User, Error>;
    async fn update_refresh_token(&self, user_id: i64, token: Option<&str>) -> Result<(), Error>;
    async fn confirm_email(&self, email: &str) -> Result<(), Error>;
    async fn set_role(&self, user_id: i64, role: Role) -> Result<(), Error>;
    async fn set_banned(&self, user_id: i64, banned: bool) -> Result<(), Error>;
    async fn update_about(&self, user_id: i64, about: Option<&str>) -> Result<(), Error>;
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find_by_email(&self, email: &str) -> Option<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        match sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.db_conn.get_pool())
            .await
        {
            Ok(user) => user,
            Err(e) => {
                secure_log::secure_error!("User lookup by email failed", e);
                None
            }
        }
    }

    async fn find_by_name(&self, name: &str) -> Option<User> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE name = $1");
        match sqlx::query_as::<_, User>(&query)
            .bind(name)
            .fetch_optional(self.db_conn.get_pool())
            .await
        {
            Ok(user) => user,
            Err(e) => {
                secure_log::secure_error!("User lookup by name failed", e);
                None
            }
        }
    }

    async fn find(&self, id: i64) -> Result<User, Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_one(self.db_conn.get_pool())
            .await
    }

    async fn count(&self) -> Result<i64, Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.db_conn.get_pool())
            .await
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str, role: Role) -> Result<User, Error> {
        let query = format!(
            "INSERT INTO users (name, email, password, role, is_active, banned) \
             VALUES ($1, $2, $3, $4, FALSE, FALSE) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(role)
            .fetch_one(self.db_conn.get_pool())
            .await
    }

    async fn update_refresh_token(&self, user_id: i64, token: Option<&str>) -> Result<(), Error> {
        sqlx::query("UPDATE users SET refresh_token = $1, modified = NOW() WHERE id = $2")
            .bind(token)
            .bind(user_id)
            .execute(self.db_conn.get_pool())
            .await?;
        Ok(())
    }

    async fn confirm_email(&self, email: &str) -> Result<(), Error> {
        sqlx::query("UPDATE users SET is_active = TRUE, modified = NOW() WHERE email = $1")
            .bind(email)
            .execute(self.db_conn.get_pool())
            .await?;
        Ok(())
    }

    async fn set_role(&self, user_id: i64, role: Role) -> Result<(), Error> {
        sqlx::query("UPDATE users SET role = $1, modified = NOW() WHERE id = $2")
            .bind(role)
            .bind(user_id)
            .execute(self.db_conn.get_pool())
            .await?;
        Ok(())
    }

    async fn set_banned(&self, user_id: i64, banned: bool) -> Result<(), Error> {
        sqlx::query("UPDATE users SET banned = $1, modified = NOW() WHERE id = $2")
            .bind(banned)
            .bind(user_id)
            .execute(self.db_conn.get_pool())
            .await?;
        Ok(())
    }

    async fn update_about(&self, user_id: i64, about: Option<&str>) -> Result<(), Error> {
        sqlx::query("UPDATE users SET about = $1, modified = NOW() WHERE id = $2")
            .bind(about)
            .bind(user_id)
            .execute(self.db_conn.get_pool())
            .await?;
        Ok(())
    }
}
