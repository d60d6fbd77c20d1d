use crate::config::database::Database;
use crate::config::logging::secure_log;
use crate::dto::token_dto::{TokenPairDto, TokenScope};
use crate::entity::user::{Role, User};
use crate::error::authorization_error::AuthorizationError;
use crate::error::db_error::DbError;
use crate::error::token_error::TokenError;
use crate::error::user_error::UserError;
use crate::error::ApiError;
use crate::repository::user_repository::{UserRepository, UserRepositoryTrait};
use crate::service::session_service::SessionStore;
use crate::service::token_service::{TokenService, TokenServiceTrait};
use std::sync::Arc;
use tracing::{info, warn};

/// Orchestrates login, logout, refresh, and per-request identity resolution.
/// The credential store and the session whitelist are independent services;
/// no transaction spans both, so a crash between the whitelist put and the
/// refresh-token write can leave them inconsistent. Known gap, no retries.
///
/// Generic over the credential store so the session flows can run against an
/// in-memory repository in tests.
#[derive(Clone)]
pub struct AuthService<R = UserRepository> {
    user_repo: R,
    token_service: TokenService,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(
        db_conn: &Arc<Database>,
        token_service: TokenService,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self::with_repository(UserRepository::new(db_conn), token_service, sessions)
    }

    pub fn hash_password(plain: &str, cost: u32) -> Result<String, ApiError> {
        bcrypt::hash(plain, cost).map_err(|e| {
            secure_log::secure_error!("Failed to hash password", e);
            ApiError::Db(DbError::SomethingWentWrong("Password hashing failed".to_string()))
        })
    }

    /// A mismatch is a plain `false`, never an error; verification system
    /// errors also report `false` to avoid a distinguishable failure mode.
    pub fn verify_password(plain: &str, hash: &str) -> bool {
        bcrypt::verify(plain, hash).unwrap_or(false)
    }

    pub fn check_access(user: &User, owner_id: i64) -> Result<(), AuthorizationError> {
        if user.id == owner_id || matches!(user.role, Role::Admin | Role::Moderator) {
            Ok(())
        } else {
            Err(AuthorizationError::AccessDenied)
        }
    }

    pub fn check_admin(user: &User, allowed_roles: &[Role]) -> Result<(), AuthorizationError> {
        if allowed_roles.contains(&user.role) {
            Ok(())
        } else {
            Err(AuthorizationError::AccessDenied)
        }
    }
}

impl<R: UserRepositoryTrait> AuthService<R> {
    pub fn with_repository(
        user_repo: R,
        token_service: TokenService,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            user_repo,
            token_service,
            sessions,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPairDto, ApiError> {
        secure_log::sensitive_debug!("Login attempt for email: {}", email);

        let user = self.user_repo.find_by_email(email).await.ok_or_else(|| {
            warn!("Login failed - unknown account");
            UserError::UnknownAccount
        })?;

        if !AuthService::verify_password(password, &user.password) {
            warn!("Login failed - invalid password for user ID: {}", user.id);
            return Err(UserError::InvalidCredentials)?;
        }
        if !user.is_active {
            return Err(UserError::AccountNotConfirmed)?;
        }
        if user.banned {
            return Err(UserError::AccountBanned)?;
        }

        let pair = self.issue_session(&user).await?;
        info!("Login successful for user ID: {}", user.id);
        Ok(pair)
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPairDto, ApiError> {
        let claims = self.token_service.decode(refresh_token, TokenScope::RefreshToken)?;

        let user = self
            .user_repo
            .find_by_email(&claims.sub)
            .await
            .ok_or(TokenError::InvalidToken)?;

        // The stored value must match exactly: once a refresh token has been
        // rotated, any replay of the old one is treated as compromise and
        // forces a full re-login.
        if user.refresh_token.as_deref() != Some(refresh_token) {
            warn!("Refresh token mismatch for user ID: {}, clearing stored token", user.id);
            self.user_repo.update_refresh_token(user.id, None).await?;
            return Err(TokenError::RefreshTokenMismatch)?;
        }

        let pair = self.issue_session(&user).await?;
        info!("Token pair rotated for user ID: {}", user.id);
        Ok(pair)
    }

    /// Idempotent: logging out twice is not an error.
    pub async fn logout(&self, user: &User) -> Result<(), ApiError> {
        self.sessions.delete(user.id).await.map_err(|e| {
            secure_log::secure_error!("Failed to delete session whitelist entry", e);
            DbError::SomethingWentWrong("Session store error".to_string())
        })?;
        self.user_repo.update_refresh_token(user.id, None).await?;
        info!("Logout completed for user ID: {}", user.id);
        Ok(())
    }

    /// Banned/active are deliberately not re-checked here; a mid-session ban
    /// takes effect once the whitelist entry expires.
    pub async fn resolve_current_user(&self, access_token: &str) -> Result<User, ApiError> {
        let claims = self.token_service.decode(access_token, TokenScope::AccessToken)?;

        let user = self
            .user_repo
            .find_by_email(&claims.sub)
            .await
            .ok_or(TokenError::InvalidToken)?;

        let live_token = self.sessions.get(user.id).await.map_err(|e| {
            secure_log::secure_error!("Session whitelist lookup failed", e);
            DbError::SomethingWentWrong("Session store error".to_string())
        })?;

        // The whitelist decides whether the session is alive. An absent entry
        // covers natural expiry and logout; a different value means a newer
        // login replaced this session.
        match live_token {
            Some(token) if token == access_token => Ok(user),
            _ => Err(TokenError::InvalidToken)?,
        }
    }

    /// Issue an access+refresh pair, record the access token in the
    /// whitelist with the same TTL, and persist the refresh token. Shared by
    /// login and refresh so both produce an identical response shape.
    async fn issue_session(&self, user: &User) -> Result<TokenPairDto, ApiError> {
        let access_token = self.token_service.issue(&user.email, TokenScope::AccessToken, None)?;
        let refresh_token = self.token_service.issue(&user.email, TokenScope::RefreshToken, None)?;

        self.sessions
            .put(user.id, &access_token, self.token_service.access_ttl_seconds())
            .await
            .map_err(|e| {
                secure_log::secure_error!("Failed to store session whitelist entry", e);
                DbError::SomethingWentWrong("Session store error".to_string())
            })?;

        self.user_repo.update_refresh_token(user.id, Some(&refresh_token)).await?;

        Ok(TokenPairDto::bearer(access_token, refresh_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::session_service::InMemorySessionStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct MemoryUserRepository {
        users: Arc<Mutex<Vec<User>>>,
    }

    impl MemoryUserRepository {
        fn seed(&self, user: User) {
            self.users.lock().unwrap().push(user);
        }

        fn stored_refresh_token(&self, user_id: i64) -> Option<String> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .and_then(|u| u.refresh_token.clone())
        }
    }

    #[async_trait]
    impl UserRepositoryTrait for MemoryUserRepository {
        async fn find_by_email(&self, email: &str) -> Option<User> {
            self.users.lock().unwrap().iter().find(|u| u.email == email).cloned()
        }

        async fn find_by_name(&self, name: &str) -> Option<User> {
            self.users.lock().unwrap().iter().find(|u| u.name == name).cloned()
        }

        async fn find(&self, id: i64) -> Result<User, sqlx::Error> {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or(sqlx::Error::RowNotFound)
        }

        async fn count(&self) -> Result<i64, sqlx::Error> {
            Ok(self.users.lock().unwrap().len() as i64)
        }

        async fn create(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
            role: Role,
        ) -> Result<User, sqlx::Error> {
            let mut users = self.users.lock().unwrap();
            let user = User {
                id: users.len() as i64 + 1,
                name: name.to_string(),
                email: email.to_string(),
                password: password_hash.to_string(),
                role,
                is_active: false,
                banned: false,
                refresh_token: None,
                about: None,
                created_at: Utc::now(),
                modified: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn update_refresh_token(&self, user_id: i64, token: Option<&str>) -> Result<(), sqlx::Error> {
            for user in self.users.lock().unwrap().iter_mut() {
                if user.id == user_id {
                    user.refresh_token = token.map(str::to_string);
                }
            }
            Ok(())
        }

        async fn confirm_email(&self, email: &str) -> Result<(), sqlx::Error> {
            for user in self.users.lock().unwrap().iter_mut() {
                if user.email == email {
                    user.is_active = true;
                }
            }
            Ok(())
        }

        async fn set_role(&self, user_id: i64, role: Role) -> Result<(), sqlx::Error> {
            for user in self.users.lock().unwrap().iter_mut() {
                if user.id == user_id {
                    user.role = role;
                }
            }
            Ok(())
        }

        async fn set_banned(&self, user_id: i64, banned: bool) -> Result<(), sqlx::Error> {
            for user in self.users.lock().unwrap().iter_mut() {
                if user.id == user_id {
                    user.banned = banned;
                }
            }
            Ok(())
        }

        async fn update_about(&self, user_id: i64, about: Option<&str>) -> Result<(), sqlx::Error> {
            for user in self.users.lock().unwrap().iter_mut() {
                if user.id == user_id {
                    user.about = about.map(str::to_string);
                }
            }
            Ok(())
        }
    }

    const PASSWORD: &str = "longenough1";

    fn user_with_role(id: i64, role: Role) -> User {
        User {
            id,
            name: format!("user{id}"),
            email: format!("user{id}@x.com"),
            password: String::new(),
            role,
            is_active: true,
            banned: false,
            refresh_token: None,
            about: None,
            created_at: Utc::now(),
            modified: Utc::now(),
        }
    }

    fn account(id: i64) -> User {
        let mut user = user_with_role(id, Role::User);
        // Low cost keeps the tests fast; production cost comes from config.
        user.password = AuthService::hash_password(PASSWORD, 4).unwrap();
        user
    }

    fn service(
        repo: MemoryUserRepository,
    ) -> (AuthService<MemoryUserRepository>, Arc<InMemorySessionStore>) {
        crate::config::logging::init();
        let token_service =
            TokenService::new("0123456789abcdef0123456789abcdef".to_string(), 900, 7, 3).unwrap();
        let sessions = Arc::new(InMemorySessionStore::new());
        let svc = AuthService::with_repository(
            repo,
            token_service,
            sessions.clone() as Arc<dyn SessionStore>,
        );
        (svc, sessions)
    }

    #[tokio::test]
    async fn test_login_then_resolve_roundtrip() {
        let repo = MemoryUserRepository::default();
        repo.seed(account(1));
        let (svc, _) = service(repo.clone());

        let pair = svc.login("user1@x.com", PASSWORD).await.unwrap();
        assert_eq!(pair.token_type, "bearer");

        let resolved = svc.resolve_current_user(&pair.access_token).await.unwrap();
        assert_eq!(resolved.id, 1);
        assert_eq!(resolved.email, "user1@x.com");
        assert_eq!(repo.stored_refresh_token(1), Some(pair.refresh_token));
    }

    #[tokio::test]
    async fn test_login_failure_modes() {
        let repo = MemoryUserRepository::default();
        let mut unconfirmed = account(2);
        unconfirmed.is_active = false;
        let mut banned = account(3);
        banned.banned = true;
        repo.seed(account(1));
        repo.seed(unconfirmed);
        repo.seed(banned);
        let (svc, _) = service(repo);

        let err = svc.login("nobody@x.com", PASSWORD).await.unwrap_err();
        assert!(matches!(err, ApiError::User(UserError::UnknownAccount)));

        let err = svc.login("user1@x.com", "wrong-password").await.unwrap_err();
        assert!(matches!(err, ApiError::User(UserError::InvalidCredentials)));

        let err = svc.login("user2@x.com", PASSWORD).await.unwrap_err();
        assert!(matches!(err, ApiError::User(UserError::AccountNotConfirmed)));

        let err = svc.login("user3@x.com", PASSWORD).await.unwrap_err();
        assert!(matches!(err, ApiError::User(UserError::AccountBanned)));
    }

    #[tokio::test]
    async fn test_logout_invalidates_unexpired_token() {
        let repo = MemoryUserRepository::default();
        repo.seed(account(1));
        let (svc, _) = service(repo.clone());

        let pair = svc.login("user1@x.com", PASSWORD).await.unwrap();
        let user = svc.resolve_current_user(&pair.access_token).await.unwrap();

        svc.logout(&user).await.unwrap();

        // The token's own exp has not passed; only the whitelist entry is gone.
        let err = svc.resolve_current_user(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Token(TokenError::InvalidToken)));
        assert_eq!(repo.stored_refresh_token(1), None);

        // Idempotent
        svc.logout(&user).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_rotates_and_rejects_replay() {
        let repo = MemoryUserRepository::default();
        repo.seed(account(1));
        let (svc, _) = service(repo.clone());

        let first = svc.login("user1@x.com", PASSWORD).await.unwrap();

        // iat has second granularity; wait so the rotated pair differs from
        // the first one.
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let second = svc.refresh(&first.refresh_token).await.unwrap();
        assert_ne!(second.refresh_token, first.refresh_token);
        assert_eq!(repo.stored_refresh_token(1), Some(second.refresh_token.clone()));

        // Replaying the consumed token clears the stored one and fails.
        let err = svc.refresh(&first.refresh_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Token(TokenError::RefreshTokenMismatch)));
        assert_eq!(repo.stored_refresh_token(1), None);

        // The rotated token no longer matches either; a full re-login is due.
        let err = svc.refresh(&second.refresh_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Token(TokenError::RefreshTokenMismatch)));
    }

    #[tokio::test]
    async fn test_second_login_invalidates_first_session() {
        let repo = MemoryUserRepository::default();
        repo.seed(account(1));
        let (svc, _) = service(repo);

        let first = svc.login("user1@x.com", PASSWORD).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        let second = svc.login("user1@x.com", PASSWORD).await.unwrap();
        assert_ne!(second.access_token, first.access_token);

        let err = svc.resolve_current_user(&first.access_token).await.unwrap_err();
        assert!(matches!(err, ApiError::Token(TokenError::InvalidToken)));
        assert_eq!(svc.resolve_current_user(&second.access_token).await.unwrap().id, 1);
    }

    #[test]
    fn test_check_access_owner() {
        let user = user_with_role(1, Role::User);
        assert!(AuthService::check_access(&user, 1).is_ok());
        assert_eq!(AuthService::check_access(&user, 2), Err(AuthorizationError::AccessDenied));
    }

    #[test]
    fn test_check_access_privileged_roles() {
        let admin = user_with_role(1, Role::Admin);
        let moderator = user_with_role(2, Role::Moderator);

        assert!(AuthService::check_access(&admin, 99).is_ok());
        assert!(AuthService::check_access(&moderator, 99).is_ok());
    }

    #[test]
    fn test_check_admin_default_roles() {
        let allowed = [Role::Admin, Role::Moderator];

        assert!(AuthService::check_admin(&user_with_role(1, Role::Admin), &allowed).is_ok());
        assert!(AuthService::check_admin(&user_with_role(2, Role::Moderator), &allowed).is_ok());
        assert_eq!(
            AuthService::check_admin(&user_with_role(3, Role::User), &allowed),
            Err(AuthorizationError::AccessDenied)
        );
    }

    #[test]
    fn test_check_admin_restricted_to_admin() {
        let allowed = [Role::Admin];

        assert!(AuthService::check_admin(&user_with_role(1, Role::Admin), &allowed).is_ok());
        assert_eq!(
            AuthService::check_admin(&user_with_role(2, Role::Moderator), &allowed),
            Err(AuthorizationError::AccessDenied)
        );
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = AuthService::hash_password(PASSWORD, 4).unwrap();

        assert!(AuthService::verify_password(PASSWORD, &hash));
        assert!(!AuthService::verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_verify_against_garbage_hash_is_false() {
        assert!(!AuthService::verify_password(PASSWORD, "not-a-bcrypt-hash"));
    }
}
