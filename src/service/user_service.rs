use crate::config::database::Database;
use crate::dto::user_dto::{UserReadDto, UserRegisterDto};
use crate::entity::user::{Role, User};
use crate::error::user_error::UserError;
use crate::error::ApiError;
use crate::repository::user_repository::{UserRepository, UserRepositoryTrait};
use crate::service::auth_service::AuthService;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(db_conn: &Arc<Database>, bcrypt_cost: u32) -> Self {
        Self {
            user_repo: UserRepository::new(db_conn),
            bcrypt_cost,
        }
    }

    /// Accounts start inactive with the default role and are activated by
    /// email confirmation. The very first account ever created is promoted
    /// to admin.
    pub async fn create_user(&self, payload: UserRegisterDto) -> Result<User, ApiError> {
        if self.user_repo.find_by_email(&payload.email).await.is_some() {
            return Err(UserError::UserAlreadyExists)?;
        }

        let hashed_password = AuthService::hash_password(&payload.password, self.bcrypt_cost)?;

        let existing = self.user_repo.count().await?;
        let role = if existing == 0 { Role::Admin } else { Role::User };

        let user = self
            .user_repo
            .create(&payload.name, &payload.email, &hashed_password, role)
            .await?;

        info!("User created with ID: {} and role: {}", user.id, user.role);
        Ok(user)
    }

    pub async fn confirm_email(&self, email: &str) -> Result<(), ApiError> {
        self.user_repo.confirm_email(email).await?;
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.user_repo.find_by_email(email).await
    }

    pub async fn find_by_name(&self, name: &str) -> Result<User, ApiError> {
        self.user_repo
            .find_by_name(name)
            .await
            .ok_or(UserError::UserNotFound.into())
    }

    pub async fn change_role(&self, target: &User, new_role: &str) -> Result<Role, ApiError> {
        let role = Role::parse(new_role).ok_or(UserError::InvalidRole)?;
        self.user_repo.set_role(target.id, role).await?;
        info!("Role of user ID: {} changed to {}", target.id, role);
        Ok(role)
    }

    /// Toggles the banned flag; one endpoint serves both ban and unban.
    pub async fn ban_toggle(&self, target: &User) -> Result<bool, ApiError> {
        let banned = !target.banned;
        self.user_repo.set_banned(target.id, banned).await?;
        info!("User ID: {} banned flag set to {}", target.id, banned);
        Ok(banned)
    }

    pub async fn update_about(&self, user: &User, text: &str) -> Result<UserReadDto, ApiError> {
        self.user_repo.update_about(user.id, Some(text)).await?;
        let updated = self.user_repo.find(user.id).await?;
        Ok(UserReadDto::from_user(updated, false))
    }

    pub async fn clear_about(&self, user: &User) -> Result<(), ApiError> {
        self.user_repo.update_about(user.id, None).await?;
        Ok(())
    }
}
