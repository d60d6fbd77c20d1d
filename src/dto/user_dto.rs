use crate::entity::user::{Role, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct UserRegisterDto {
    #[validate(length(min = 4, max = 50, message = "Name must be between 4 and 50 characters"))]
    pub name: String,
    #[validate(email(message = "Email format is invalid"))]
    #[validate(length(max = 254, message = "Email must not exceed 254 characters"))]
    pub email: String,
    #[validate(length(min = 8, max = 25, message = "Password must be between 8 and 25 characters"))]
    pub password: String,
}

/// Login form, OAuth2 password-flow style: `username` carries the email.
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct UserLoginDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct UserReadDto {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub banned: bool,
    pub is_online: bool,
    pub about: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl UserReadDto {
    pub fn from_user(model: User, is_online: bool) -> UserReadDto {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            is_active: model.is_active,
            banned: model.banned,
            is_online,
            about: model.about,
            created_at: model.created_at,
            modified: model.modified,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct UserCreationRespDto {
    pub user: UserReadDto,
    pub detail: String,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAboutDto {
    #[validate(length(min = 1, max = 1024, message = "About must be between 1 and 1024 characters"))]
    pub about: String,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct BanUserDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    pub confirmation: bool,
}

#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct ChangeRoleDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

impl std::fmt::Debug for UserLoginDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User").field("username", &self.username).finish()
    }
}

impl std::fmt::Debug for UserRegisterDto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish()
    }
}
