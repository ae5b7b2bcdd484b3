use core_config::{app_info, database::DatabaseConfig, server::ServerConfig, AppInfo, FromEnv};

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Optional: the service falls back to the in-memory store when unset
    pub database: Option<DatabaseConfig>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let database = std::env::var("DATABASE_URL").ok().map(DatabaseConfig::new);

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            database,
        })
    }
}
