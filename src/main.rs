mod config;
mod db;
mod errors;
mod gateway;
mod middleware;
mod models;
mod observability;
mod routes;
mod services;
mod state;
mod utils;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::info;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::gateway::{SeaOrmGateway, SessionGateway};
use crate::models::users::UserDirectory;
use crate::services::sweeper::SessionSweeper;
use crate::state::AppState;
use crate::utils::clock::{Clock, SystemClock};
use crate::utils::storage::JsonFileStorage;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    dotenv::dotenv().ok();
    observability::init();

    let config = AppConfig::from_env()?;

    info!("Connecting to database...");
    let db = db::establish_connection(&config).await?;
    info!("Database connected");

    let gateway: Arc<dyn SessionGateway> = Arc::new(SeaOrmGateway::new(db));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let storage = Arc::new(JsonFileStorage::new(config.session_storage_dir.clone())?);
    let state = AppState::new(gateway.clone(), UserDirectory::default(), clock.clone(), storage);
    info!(users = state.users.users().len(), "User directory loaded");

    // Fermeture des sessions oubliées avant d'accepter des connexions
    SessionSweeper::sweep_expired(gateway.as_ref(), clock.today()).await;
    let sweeper = SessionSweeper::spawn(gateway, clock, config.sweep_interval);

    info!(host = %config.host, port = config.port, "Starting server");

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure_routes)
    })
        .bind((config.host.as_str(), config.port))?
        .run()
        .await;

    sweeper.abort();
    info!("Server stopped");
    server.map_err(AppError::from)
}
