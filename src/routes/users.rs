use crate::handler::user_handler;
use crate::state::user_state::UserState;
use axum::{
    routing::{delete, get, patch},
    Router,
};

pub fn routes() -> Router<UserState> {
    Router::<UserState>::new()
        .route("/auth/user", get(user_handler::profile))
        .route("/auth/user/about", patch(user_handler::update_about))
        .route("/auth/user/about", delete(user_handler::delete_about))
        .route("/auth/user/ban", patch(user_handler::ban_user))
        .route("/auth/user/role", patch(user_handler::change_role))
}
