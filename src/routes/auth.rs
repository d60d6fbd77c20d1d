use crate::handler::auth_handler;
use crate::state::auth_state::AuthState;
use axum::{
    routing::{get, post},
    Router,
};

/// Endpoints reachable without a session.
pub fn public_routes() -> Router<AuthState> {
    Router::<AuthState>::new()
        .route("/auth/signup", post(auth_handler::register))
        .route("/auth/login", post(auth_handler::login))
        .route("/auth/refresh_token", get(auth_handler::refresh_token))
        .route("/auth/confirmed_email/{token}", get(auth_handler::confirmed_email))
        .route("/auth/request_email", post(auth_handler::request_email))
}

/// Logout needs the resolved user from the auth middleware.
pub fn protected_routes() -> Router<AuthState> {
    Router::<AuthState>::new().route("/auth/logout", post(auth_handler::logout))
}
