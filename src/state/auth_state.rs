use crate::config::database::Database;
use crate::service::auth_service::AuthService;
use crate::service::mail_service::MailService;
use crate::service::session_service::SessionStore;
use crate::service::token_service::TokenService;
use crate::service::user_service::UserService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AuthState {
    pub(crate) auth_service: AuthService,
    pub(crate) user_service: UserService,
    pub(crate) token_service: TokenService,
    pub(crate) mailer: Arc<MailService>,
}

impl AuthState {
    pub fn new(
        db_conn: &Arc<Database>,
        token_service: TokenService,
        sessions: Arc<dyn SessionStore>,
        mailer: Arc<MailService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth_service: AuthService::new(db_conn, token_service.clone(), sessions),
            user_service: UserService::new(db_conn, bcrypt_cost),
            token_service,
            mailer,
        }
    }
}
