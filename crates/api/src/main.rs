use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use quill_api::config::ServerConfig;
use quill_api::router::build_app_router;
use quill_api::state::AppState;
use quill_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "quill_api=debug,quill_db=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = SocketAddr::new(
        config.host.parse().expect("HOST must be an IP address"),
        config.port,
    );
    tracing::info!(
        %addr,
        request_timeout_secs = config.request_timeout_secs,
        recently_viewed_capacity = config.recently_viewed_capacity,
        "Configuration loaded"
    );

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = prepare_database(&database_url).await;

    // The tracker is created here, with the state, and lives until shutdown.
    let state = AppState::new(pool.clone(), config);
    let tracker = state.recently_viewed.clone();
    let app = build_app_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!(
        tracked_users = tracker.tracked_users(),
        "Discarding recently-viewed histories"
    );
    drop(tracker);

    pool.close().await;
    tracing::info!("Shutdown complete");
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify connectivity, and bring the schema up to date.
async fn prepare_database(database_url: &str) -> DbPool {
    let pool = quill_db::create_pool(database_url)
        .await
        .expect("Failed to connect to database");
    quill_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    quill_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");
    pool
}

/// Resolve on SIGINT, or SIGTERM on Unix.
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
        () = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
