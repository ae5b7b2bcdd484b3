use axum_helpers::server::{create_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    init_tracing(&config.environment);

    // Pick the user store: Postgres when configured, in-memory otherwise.
    let api_routes = match &config.database {
        Some(database) => {
            let db = connect_postgres(&database.url).await?;
            Migrator::up(&db, None).await?;
            api::routes(api::UserStore::Postgres(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, user records live in memory only");
            api::routes(api::UserStore::InMemory)
        }
    };

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes);

    // /health: liveness check with app name/version
    let app = router.merge(health_router(config.app.clone()));

    create_app(app, &config.server).await?;

    Ok(())
}

/// Connect to PostgreSQL with conservative pool settings.
async fn connect_postgres(database_url: &str) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut opt = ConnectOptions::new(database_url);
    opt.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;

    info!("Connected to PostgreSQL database");
    Ok(db)
}
