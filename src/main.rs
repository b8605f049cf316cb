//! Repair Shop API
//!
//! CRUD over items, customers, technicians and service records for a repair
//! shop, backed by PostgreSQL.
//!
//! Every entity is served twice: once through direct SQL statements and once
//! through stored routines under `/procedures`. Both surfaces share the same
//! handlers, validation and response shapes.

mod config;
mod db;
mod error;
mod models;
mod routes;
mod state;
mod store;

use crate::config::Settings;
use crate::routes::{create_router, PROCEDURES_PREFIX};
use crate::state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Repair Shop API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let pool = match db::connect(&settings.database).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ FATAL: Failed to initialize database pool: {}", e);
            error!("DATABASE_URL (or DB_HOST/DB_NAME/...) must point at a reachable database");
            return Err(e);
        }
    };

    if settings.database.bootstrap {
        if let Err(e) = db::schema::ensure_schema(&pool).await {
            warn!("⚠️  Warning creating schema: {}", e);
        }
    }

    let state = AppState::new(pool);

    // Build the router
    let app = create_router(&state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints (direct SQL):");
    info!("   GET|POST            /items, /customers, /technicians, /service-records");
    info!("   GET|PUT|DELETE      /<collection>/{{id}}");
    info!("   GET                 /items/brand/{{brand}}");
    info!("");
    info!("📚 API Endpoints (stored routines):");
    info!("   same routes under   {}/...", PROCEDURES_PREFIX);
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,repair_shop_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
