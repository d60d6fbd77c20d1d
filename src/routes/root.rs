use crate::config::database::Database;
use crate::config::parameter;
use crate::error::token_error::TokenError;
use crate::handler::health_handler::HealthState;
use crate::middleware::auth as auth_middleware;
use crate::middleware::rate_limit::{self, RateLimitState};
use crate::routes::{auth, health, photos, users};
use crate::service::mail_service::MailService;
use crate::service::session_service::SessionStore;
use crate::service::token_service::{TokenService, TokenServiceTrait};
use crate::state::auth_state::AuthState;
use crate::state::photo_state::PhotoState;
use crate::state::token_state::TokenState;
use crate::state::user_state::UserState;
use axum::{middleware, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub fn routes(
    db_conn: Arc<Database>,
    sessions: Arc<dyn SessionStore>,
    mailer: Arc<MailService>,
) -> Result<Router, TokenError> {
    let token_service = TokenService::from_parameters()?;
    let bcrypt_cost = parameter::get_u32("BCRYPT_COST");

    let auth_state = AuthState::new(
        &db_conn,
        token_service.clone(),
        Arc::clone(&sessions),
        mailer,
        bcrypt_cost,
    );
    let user_state = UserState::new(&db_conn, Arc::clone(&sessions), bcrypt_cost);
    let photo_state = PhotoState::new(&db_conn);
    let token_state = TokenState::new(&db_conn, token_service, Arc::clone(&sessions));

    let rate_limit_state = RateLimitState::new(
        parameter::get_u32("RATE_LIMIT_REQUESTS_PER_MINUTE"),
        60,
    );

    let require_auth = ServiceBuilder::new().layer(middleware::from_fn_with_state(
        token_state,
        auth_middleware::auth,
    ));

    let merged_router = auth::public_routes()
        .layer(middleware::from_fn_with_state(
            rate_limit_state,
            rate_limit::rate_limit,
        ))
        .merge(auth::protected_routes().layer(require_auth.clone()))
        .with_state(auth_state)
        .merge(users::routes().layer(require_auth.clone()).with_state(user_state))
        .merge(
            photos::public_routes()
                .merge(photos::protected_routes().layer(require_auth))
                .with_state(photo_state),
        )
        .merge(health::routes(HealthState {
            db: db_conn,
            sessions,
        }));

    let app_router = Router::new()
        .nest("/api", merged_router)
        .layer(TraceLayer::new_for_http());

    Ok(app_router)
}
