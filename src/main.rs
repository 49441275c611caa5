//! Application entry point and server initialization
//!
//! Loads configuration, opens the database, serves HTTP until a shutdown
//! signal arrives, then closes the database.

use std::net::SocketAddr;
use std::process;
use tokio::net::TcpListener;
use tokio::signal;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use microservices::config::{Config, DEFAULT_LOG_FILTER};
use microservices::database::{init_db, AppState};
use microservices::route::create_app;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // A missing database location is fatal before anything is bound
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            process::exit(1);
        }
    };

    let db = match init_db(&config.database_url) {
        Ok(db) => db,
        Err(err) => {
            tracing::error!(error = %err, path = %config.database_url, "failed to open database");
            process::exit(1);
        }
    };
    let state = AppState::new(db);

    let app = create_app(state.clone())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind");
            process::exit(1);
        }
    };

    tracing::info!(%addr, database = %config.database_url, "server running");

    // Serve until SIGTERM or SIGINT; in-flight requests are allowed to finish
    let served = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    if let Err(err) = served {
        tracing::error!(error = %err, "server error");
    }

    if let Err(err) = state.close() {
        tracing::warn!(error = %err, "database not closed cleanly");
    }
}

/// Handles graceful shutdown signals
///
/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, stopping server");
}
