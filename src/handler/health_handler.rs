use crate::config::database::DatabaseTrait;
use crate::config::logging::secure_log;
use crate::response::app_response::SuccessResponse;
use crate::service::session_service::SessionStore;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub version: String,
    pub database: ComponentHealth,
    pub session_store: ComponentHealth,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ComponentHealth {
    pub status: String,
    pub response_time_ms: Option<u128>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct HealthState {
    pub db: Arc<crate::config::database::Database>,
    pub sessions: Arc<dyn SessionStore>,
}

static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

pub fn init_start_time() {
    START_TIME.set(Instant::now()).ok();
}

pub fn get_uptime_seconds() -> u64 {
    START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

pub async fn health_check(State(state): State<HealthState>) -> Json<SuccessResponse<HealthStatus>> {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let database = check_database_health(&state.db).await;
    let session_store = check_session_store_health(state.sessions.as_ref()).await;

    let status = if database.status == "healthy" && session_store.status == "healthy" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(SuccessResponse::send(HealthStatus {
        status: status.to_string(),
        timestamp,
        uptime_seconds: get_uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database,
        session_store,
    }))
}

async fn check_database_health(db: &Arc<crate::config::database::Database>) -> ComponentHealth {
    let start_time = Instant::now();
    match db.get_pool().acquire().await {
        Ok(_) => {
            let response_time = start_time.elapsed().as_millis();
            info!("Database health check passed in {}ms", response_time);
            ComponentHealth {
                status: "healthy".to_string(),
                response_time_ms: Some(response_time),
                error: None,
            }
        }
        Err(e) => {
            secure_log::secure_error!("Database health check failed", e);
            ComponentHealth {
                status: "unhealthy".to_string(),
                response_time_ms: None,
                error: Some(e.to_string()),
            }
        }
    }
}

async fn check_session_store_health(sessions: &dyn SessionStore) -> ComponentHealth {
    let start_time = Instant::now();
    // User ID 0 is never allocated; a lookup exercises the round trip.
    match sessions.get(0).await {
        Ok(_) => ComponentHealth {
            status: "healthy".to_string(),
            response_time_ms: Some(start_time.elapsed().as_millis()),
            error: None,
        },
        Err(e) => {
            secure_log::secure_error!("Session store health check failed", e);
            ComponentHealth {
                status: "unhealthy".to_string(),
                response_time_ms: None,
                error: Some(e.to_string()),
            }
        }
    }
}
