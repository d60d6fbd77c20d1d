use crate::config::database::DatabaseTrait;
use crate::config::{database, parameter};
use crate::handler::health_handler;
use crate::service::mail_service::MailService;
use crate::service::session_service::RedisSessionStore;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod dto;
mod entity;
mod error;
mod handler;
mod middleware;
mod repository;
mod response;
mod routes;
mod service;
mod state;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Structured logging before anything else so startup failures are visible
    tracing_subscriber::fmt::init();

    info!("Starting PixnTalk backend...");

    parameter::init();
    info!("Configuration initialized");

    crate::config::logging::init();
    info!("Logging configuration initialized");

    health_handler::init_start_time();

    let connection = match database::Database::init().await {
        Ok(conn) => {
            info!("Database connection established successfully");
            conn
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    let sessions = match RedisSessionStore::connect(&parameter::get("REDIS_URL")).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to Redis: {}", e);
            return Err(e);
        }
    };

    let mailer = match MailService::from_parameters() {
        Ok(mailer) => {
            info!("Mail transport configured");
            mailer
        }
        Err(e) => {
            error!("Failed to configure mail transport: {}", e);
            return Err(e);
        }
    };

    let server_address = parameter::get("SERVER_ADDRESS");
    let server_port = parameter::get("SERVER_PORT");
    let host = format!("{}:{}", server_address, server_port);
    info!("Server will bind to: {}", host);

    let listener = match tokio::net::TcpListener::bind(&host).await {
        Ok(listener) => {
            info!("Server successfully bound to {}", host);
            listener
        }
        Err(e) => {
            error!("Failed to bind to {}: {}", host, e);
            return Err(e.into());
        }
    };

    // Fails fast when the JWT secret is missing or too short
    let app = match routes::root::routes(Arc::new(connection), sessions, mailer) {
        Ok(router) => router,
        Err(e) => {
            error!("Failed to initialize routes: {}", e);
            return Err(Box::new(e) as Box<dyn std::error::Error>);
        }
    };

    info!("Server starting...");
    match axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Received shutdown signal, shutting down..."),
                Err(err) => error!("Unable to listen for shutdown signal: {}", err),
            }
        })
        .await
    {
        Ok(_) => {
            info!("Server shutdown gracefully");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {}", e);
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}
