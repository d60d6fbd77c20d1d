use crate::config::database::Database;
use crate::service::session_service::SessionStore;
use crate::service::user_service::UserService;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserState {
    pub user_service: UserService,
    pub sessions: Arc<dyn SessionStore>,
}

impl UserState {
    pub fn new(db_conn: &Arc<Database>, sessions: Arc<dyn SessionStore>, bcrypt_cost: u32) -> Self {
        Self {
            user_service: UserService::new(db_conn, bcrypt_cost),
            sessions,
        }
    }
}
