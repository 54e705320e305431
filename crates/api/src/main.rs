use anyhow::{Context, Result};
use heladeria_api::handler::AppRouter;
use shared::{
    config::{Config, ConnectionManager, ConnectionPool},
    errors::expose_internal_errors,
    state::AppState,
    utils::init_logger,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let _log_guard = init_logger("heladeria-api", is_dev, is_enable_file);

    let config = Config::init().context("Failed to load configuration")?;
    expose_internal_errors(config.debug);

    info!(
        "🚀 Starting {} v{} (debug: {})",
        config.app_name, config.app_version, config.debug
    );

    let pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;
        info!("✅ Database migrations applied");
    }

    let host = config.host.clone();
    let port = config.port;

    let state = AppState::new(pool, config)
        .await
        .context("Failed to create AppState")?;

    AppRouter::serve(&host, port, state)
        .await
        .context("Failed to start server")?;

    info!("👋 Server shut down");

    Ok(())
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
