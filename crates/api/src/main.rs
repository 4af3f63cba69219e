use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use snapbooth_core::caption::CaptionProvider;
use snapbooth_gemini::GeminiApi;
use snapbooth_store::gallery::{GalleryStore, MemoryGalleryStore, PgGalleryStore};
use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use snapbooth_api::config::ServerConfig;
use snapbooth_api::router::build_app_router;
use snapbooth_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snapbooth_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        gallery_capacity = config.gallery_capacity,
        "Loaded server configuration",
    );

    // --- Gallery store ---
    let gallery = build_gallery_store(&config).await;

    // --- Caption provider ---
    let captions: Option<Arc<dyn CaptionProvider>> = match &config.api_key {
        Some(key) => {
            let api = GeminiApi::with_client(
                reqwest::Client::new(),
                config.gemini_api_url.clone(),
                key.clone(),
            )
            .with_model(config.gemini_model.clone());
            tracing::info!(model = %api.model(), "Caption provider configured");
            Some(Arc::new(api))
        }
        None => {
            tracing::warn!("API_KEY not set, /api/generate will report a configuration error");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        gallery,
        captions,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let stop = Arc::new(Notify::new());
    let server = {
        let stop = Arc::clone(&stop);
        tokio::spawn(
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.notified().await })
                .into_future(),
        )
    };

    shutdown_signal().await;
    stop.notify_one();

    // --- Drain ---
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Graceful shutdown complete"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task failed"),
        Err(_) => tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "In-flight requests did not drain in time, exiting"
        ),
    }
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise a process-local list.
async fn build_gallery_store(config: &ServerConfig) -> Arc<dyn GalleryStore> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("DATABASE_URL not set, gallery is kept in memory");
        return Arc::new(MemoryGalleryStore::new());
    };

    let pool = snapbooth_store::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    snapbooth_store::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    snapbooth_store::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    Arc::new(PgGalleryStore::new(pool))
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
