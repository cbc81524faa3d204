//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{build_mailer, Cache, Database, MailConfig};
use crate::services::Services;

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let db = Arc::new(db);

    let cache = Cache::try_connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
    tracing::info!("Redis cache connected");

    let mail_config = MailConfig::from_env();
    tracing::debug!(?mail_config, "Mail configuration loaded");
    let mailer = build_mailer(&mail_config)
        .map_err(|e| AppError::internal(format!("Mailer setup failed: {}", e)))?;

    let addr = match (args.host, args.port) {
        (None, None) => config.server_addr(),
        (host, port) => format!(
            "{}:{}",
            host.unwrap_or_else(|| config.server_host.clone()),
            port.unwrap_or(config.server_port)
        ),
    };

    let services = Services::from_connection(
        db.connection().clone(),
        cache.clone(),
        mailer,
        config.clone(),
    );
    let app_state = AppState::new(&services, &config).with_infra(db, cache);

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
