//! Serve command - Starts the HTTP or HTTPS server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::{Config, Protocol};
use crate::errors::{AppError, AppResult};
use crate::infra::Database;

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: Config) -> AppResult<()> {
    if let Some(host) = args.host {
        config.server_host = host;
    }
    if let Some(port) = args.port {
        config.server_port = port;
    }

    tracing::info!("Starting server...");

    // Connect and apply pending migrations
    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let app_state = AppState::from_config(Arc::new(db), &config)?;
    let app = create_router(app_state);

    let addr = resolve(&config.server_addr()).await?;

    match (config.protocol, &config.tls) {
        (Protocol::Https, Some(tls)) => {
            let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                .await
                .map_err(|e| AppError::internal(format!("Failed to load TLS files: {}", e)))?;

            tracing::info!("Server running on https://{}", addr);

            axum_server::bind_rustls(addr, rustls_config)
                .serve(app.into_make_service())
                .await
                .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
        (Protocol::Https, None) => {
            return Err(AppError::internal("HTTPS requires TLS_CERT_PATH and TLS_KEY_PATH"));
        }
        (Protocol::Http, _) => {
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

            tracing::info!("Server running on http://{}", addr);

            axum::serve(listener, app)
                .await
                .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;
        }
    }

    Ok(())
}

/// Resolve `host:port`, accepting host names as well as IP literals
async fn resolve(addr: &str) -> AppResult<SocketAddr> {
    tokio::net::lookup_host(addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to resolve {}: {}", addr, e)))?
        .next()
        .ok_or_else(|| AppError::internal(format!("No address found for {}", addr)))
}
