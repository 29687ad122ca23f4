use crate::config::AppConfig;
use crate::migrator::Migrator;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub type DbPool = DatabaseConnection;

/// Connection pool settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        use crate::config::defaults;
        Self {
            url: defaults::DATABASE_URL.to_string(),
            max_connections: defaults::DB_MAX_CONNECTIONS,
            min_connections: defaults::DB_MIN_CONNECTIONS,
            connect_timeout: Duration::from_secs(defaults::DB_CONNECT_TIMEOUT_SECS),
            idle_timeout: Duration::from_secs(defaults::DB_IDLE_TIMEOUT_SECS),
            acquire_timeout: Duration::from_secs(defaults::DB_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl DbConfig {
    /// A private SQLite database living as long as the pool.
    /// Pinned to one connection, since every SQLite memory connection is its own database.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        }
    }

    fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .sqlx_logging(true);
        opt
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Opens a connection pool.
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, DbErr> {
    debug!(
        min_connections = config.min_connections,
        acquire_timeout = ?config.acquire_timeout,
        "configuring database pool"
    );

    let pool = Database::connect(config.connect_options())
        .await
        .map_err(|e| {
            error!(error = %e, "database connection failed");
            e
        })?;

    info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, DbErr> {
    establish_connection_with_config(&DbConfig::from(cfg)).await
}

/// Applies every pending embedded migration.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbErr> {
    let started = Instant::now();
    let pending = Migrator::get_pending_migrations(pool).await?.len();

    Migrator::up(pool, None).await.map_err(|e| {
        error!(error = %e, "database migrations failed");
        e
    })?;

    info!(applied = pending, elapsed = ?started.elapsed(), "database schema up to date");
    Ok(())
}

/// Round-trips a ping to the database.
pub async fn check_connection(pool: &DbPool) -> Result<(), DbErr> {
    let started = Instant::now();
    let result = pool.ping().await;
    debug!(ok = result.is_ok(), elapsed = ?started.elapsed(), "database ping");
    result
}
