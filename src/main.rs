//! Linkmarks server entry point.
//!
//! Wires configuration, the Postgres tree store, the blob store, the
//! headless capture engine and the HTTP router together, then serves
//! until a shutdown signal arrives.

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use linkmarks_api::{build_router, AppState};
use linkmarks_capture::ChromiumCapturer;
use linkmarks_core::config::AppConfig;
use linkmarks_core::error::AppError;
use linkmarks_core::traits::{BlobStore, PageCapturer};
use linkmarks_database::PgTreeStore;
use linkmarks_service::{BookmarkService, CaptureService};
use linkmarks_storage::{LocalBlobStore, MemoryBlobStore, S3BlobStore, ThumbnailEncoder};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("LINKMARKS_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Linkmarks v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db_pool = linkmarks_database::connection::create_pool(&config.database).await?;

    tracing::info!("Running database migrations...");
    linkmarks_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    let trees = Arc::new(PgTreeStore::new(db_pool));

    tracing::info!(provider = %config.storage.provider, "Initializing blob store...");
    let blobs: Arc<dyn BlobStore> = match config.storage.provider.as_str() {
        "s3" => Arc::new(S3BlobStore::new(&config.storage.s3)?),
        "local" => Arc::new(LocalBlobStore::new(&config.storage.local.root_path).await?),
        "memory" => Arc::new(MemoryBlobStore::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'"
            )))
        }
    };

    tracing::info!(
        pool_size = config.capture.effective_pool_size(),
        queue_depth = config.capture.queue_depth,
        "Launching capture engine..."
    );
    let capturer = Arc::new(ChromiumCapturer::launch(&config.capture).await?);

    let capture_service = Arc::new(CaptureService::new(
        Arc::clone(&capturer) as Arc<dyn PageCapturer>,
        Arc::clone(&blobs),
        ThumbnailEncoder::new(&config.storage.thumbnail),
    ));
    let bookmarks = Arc::new(BookmarkService::new(trees, blobs, capture_service));

    let app = build_router(AppState::new(bookmarks));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Linkmarks server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    // The router and its state are gone once serve returns; the engine
    // should be the last reference so the browser can be closed cleanly.
    match Arc::try_unwrap(capturer) {
        Ok(engine) => engine.shutdown().await,
        Err(_) => tracing::warn!("Capture engine still referenced; skipping explicit close"),
    }

    tracing::info!("Linkmarks server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
