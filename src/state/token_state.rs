use crate::config::database::Database;
use crate::service::auth_service::AuthService;
use crate::service::session_service::SessionStore;
use crate::service::token_service::TokenService;
use std::sync::Arc;

/// State handed to the authentication middleware.
#[derive(Clone)]
pub struct TokenState {
    pub auth_service: AuthService,
}

impl TokenState {
    pub fn new(
        db_conn: &Arc<Database>,
        token_service: TokenService,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(db_conn, token_service, sessions),
        }
    }
}
