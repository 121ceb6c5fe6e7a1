//! SwingReg server
//!
//! Main application entry point

use tracing::info;

use SwingReg::{
    config::Settings,
    database::{self, connection::PoolConfig, DatabaseService},
    handlers::create_router,
    services::ServiceFactory,
    state::AppState,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must stay alive for the file appender
    let _guard = logging::init_logging(&settings.logging)?;

    info!("Starting SwingReg server...");

    // Initialize database connection
    info!("Connecting to database...");
    let pool_config = PoolConfig::from_settings(&settings.database);
    let pool = database::create_pool(&pool_config).await?;

    // Run database migrations
    database::run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let db = DatabaseService::new(pool.clone());
    let services = ServiceFactory::new(pool.clone(), &settings)?;
    let state = AppState::new(pool, db, services, settings.clone());

    let app = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("SwingReg listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("SwingReg server has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received, shutting down gracefully"),
        _ = terminate => info!("SIGTERM received, shutting down gracefully"),
    }
}
