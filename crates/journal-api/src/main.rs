//! journal-api - HTTP API server for the stock trading journal

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use journal_api::services::{AttachmentLifecycle, UploadThingStore};
use journal_api::telemetry::{init_tracing, LogSettings};
use journal_api::{router, ApiConfig, AppState, StoreBackend};
use journal_db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let log_settings = LogSettings::from_env();
    let _file_guard = init_tracing("journal_api=debug,tower_http=debug", &log_settings);
    info!(
        log_format = %log_settings.format,
        log_file = log_settings.file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ApiConfig::from_env()?;

    let attachments = match &config.attachments.secret {
        Some(secret) => AttachmentLifecycle::new(Arc::new(UploadThingStore::new(
            config.attachments.api_url.clone(),
            secret.clone(),
            config.attachments.timeout,
        )?)),
        None => {
            info!("UPLOADTHING_SECRET not set, attachment cleanup disabled");
            AttachmentLifecycle::disabled()
        }
    };

    let (state, db) = match config.store_backend {
        StoreBackend::Postgres => {
            info!("Connecting to database...");
            let db =
                Database::connect_with_config(&config.database_url, config.db_pool.clone())
                    .await?;
            info!("Database connected");

            if config.run_migrations {
                info!("Running database migrations...");
                db.migrate().await?;
                info!("Database migrations complete");
            }
            (AppState::from_database(&db, attachments), Some(db))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store; data is lost on exit");
            (AppState::in_memory(attachments), None)
        }
    };

    let pool_monitor = match (&db, config.pool_stats_interval) {
        (Some(db), Some(every)) => Some(spawn_pool_monitor(db.clone(), every)),
        _ => None,
    };

    let app = router(state, &config.allowed_origins);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(monitor) = pool_monitor {
        monitor.abort();
    }
    if let Some(db) = db {
        db.pool_stats().log();
        db.close().await;
    }
    info!("Server stopped");
    Ok(())
}

/// Log pool stats on a fixed interval until aborted.
fn spawn_pool_monitor(db: Database, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            db.pool_stats().log();
        }
    })
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received");
}
