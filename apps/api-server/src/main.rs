//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::middleware::Compress;
use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::{RequestIdMiddleware, RequestIdRootSpan};
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        environment = ?config.environment,
        storage = ?config.storage,
        "Starting Quill API Server on {}:{}",
        config.host,
        config.port
    );

    let state = match AppState::new(&config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    let app_state = web::Data::new(state.clone());
    let app_config = web::Data::new(config.clone());
    let server_config = config.clone();

    // Last `wrap` runs first: security headers are outermost, error handlers innermost.
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(app_config.clone())
            .wrap(middleware::error::error_handlers())
            .wrap(TracingLogger::<RequestIdRootSpan>::new())
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(middleware::security::cors(&server_config))
            .wrap(middleware::security::security_headers(&server_config))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped");

    #[cfg(feature = "postgres")]
    if let Some(pool) = &state.db {
        pool.close().await;
    }

    Ok(())
}
