//! YogaStudio API server
//!
//! Main application entry point

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};

use YogaStudio::{
    config::Settings,
    create_router,
    database::{connection::{create_pool, run_migrations, DatabaseConfig}, DatabaseService},
    utils::logging,
    AppState, ServiceFactory,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    // Initialize logging; the guard must outlive the server
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!(version = YogaStudio::VERSION, environment = %settings.app.environment, "Starting YogaStudio API...");
    if settings.app.environment.is_development() {
        warn!("Development mode: admin self-promotion is enabled");
    }

    // Initialize database connection
    info!("Connecting to database...");
    let db_pool = create_pool(&DatabaseConfig::from(&settings.database))
        .await
        .context("Failed to connect to database")?;

    if settings.database.run_migrations {
        run_migrations(&db_pool).await.context("Failed to run migrations")?;
    }

    // Initialize services
    let database_service = DatabaseService::new(db_pool);
    let services = ServiceFactory::new(database_service, &settings)
        .context("Failed to initialize services")?;
    let bind_address = settings.server.bind_address();
    let state = AppState::new(services, settings);

    spawn_limiter_pruning(&state);

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    info!(address = %bind_address, "YogaStudio API is listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("YogaStudio API has been shut down.");
    Ok(())
}

/// Periodically drop limiter state for emails whose quota has recovered
fn spawn_limiter_pruning(state: &AppState) {
    if !state.login_limiter.is_enabled() {
        return;
    }

    let limiter = state.login_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limiter.prune();
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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
