use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use validator::{Validate, ValidationError, ValidationErrors};

const CONFIG_DIR: &str = "config";

/// Built-in values, the lowest configuration layer.
pub mod defaults {
    pub const ENVIRONMENT: &str = "development";
    pub const DATABASE_URL: &str = "sqlite://purchase_orders.db?mode=rwc";
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 8080;
    pub const LOG_LEVEL: &str = "info";
    pub const DB_MAX_CONNECTIONS: u32 = 10;
    pub const DB_MIN_CONNECTIONS: u32 = 1;
    pub const DB_CONNECT_TIMEOUT_SECS: u64 = 30;
    pub const DB_IDLE_TIMEOUT_SECS: u64 = 600;
    pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;
}

/// Front-end dev servers allowed when no origins are configured.
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174,http://localhost:3000,http://127.0.0.1:5173,http://127.0.0.1:5174,http://127.0.0.1:3000";

/// Server, database and CORS settings.
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub database_url: String,
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// `development`, `test`, `production`, ...
    pub environment: String,
    #[validate(custom = "validate_log_level")]
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub log_json: bool,
    /// Apply pending schema migrations at start-up.
    pub auto_migrate: bool,

    /// Comma-separated list of allowed origins.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
    #[serde(default)]
    pub cors_allow_any_origin: bool,
    #[serde(default)]
    pub cors_allow_credentials: bool,

    #[validate(range(min = 1))]
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout_secs: u64,
    pub db_idle_timeout_secs: u64,
    pub db_acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Builds a configuration with defaults for everything but the essentials.
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: defaults::LOG_LEVEL.to_string(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            cors_allow_credentials: false,
            db_max_connections: defaults::DB_MAX_CONNECTIONS,
            db_min_connections: defaults::DB_MIN_CONNECTIONS,
            db_connect_timeout_secs: defaults::DB_CONNECT_TIMEOUT_SECS,
            db_idle_timeout_secs: defaults::DB_IDLE_TIMEOUT_SECS,
            db_acquire_timeout_secs: defaults::DB_ACQUIRE_TIMEOUT_SECS,
        }
    }

    /// Deserializes a built configuration and runs every check on it.
    pub fn from_config(config: Config) -> Result<Self, AppConfigError> {
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.check()?;
        Ok(app_config)
    }

    /// Field rules plus the rules spanning several fields.
    pub fn check(&self) -> Result<(), AppConfigError> {
        self.validate().map_err(AppConfigError::Validation)?;
        self.check_deployment_rules()
            .map_err(AppConfigError::Validation)
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Configured CORS origins, trimmed, empty entries dropped.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Any origin is accepted when explicitly enabled, or in development with no list.
    pub fn should_allow_permissive_cors(&self) -> bool {
        self.cors_allow_any_origin || (self.is_development() && self.cors_origins().is_empty())
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn check_deployment_rules(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !self.is_development() && !self.cors_allow_any_origin && self.cors_origins().is_empty()
        {
            let mut err = ValidationError::new("cors_allowed_origins_required");
            err.message = Some(
                "set APP__CORS_ALLOWED_ORIGINS outside development, or APP__CORS_ALLOW_ANY_ORIGIN=true".into(),
            );
            errors.add("cors_allowed_origins", err);
        }

        if self.db_min_connections > self.db_max_connections {
            let mut err = ValidationError::new("db_min_connections");
            err.message = Some("db_min_connections must not exceed db_max_connections".into());
            errors.add("db_min_connections", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    level.parse::<tracing::Level>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        err
    })
}

/// Defaults layer shared by [`load_config`] and tests.
fn with_defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("environment", environment)?
        .set_default("database_url", defaults::DATABASE_URL)?
        .set_default("host", defaults::HOST)?
        .set_default("port", i64::from(defaults::PORT))?
        .set_default("log_level", defaults::LOG_LEVEL)?
        .set_default("auto_migrate", true)?
        .set_default("cors_allowed_origins", DEFAULT_CORS_ORIGINS)?
        .set_default("db_max_connections", i64::from(defaults::DB_MAX_CONNECTIONS))?
        .set_default("db_min_connections", i64::from(defaults::DB_MIN_CONNECTIONS))?
        .set_default("db_connect_timeout_secs", defaults::DB_CONNECT_TIMEOUT_SECS as i64)?
        .set_default("db_idle_timeout_secs", defaults::DB_IDLE_TIMEOUT_SECS as i64)?
        .set_default("db_acquire_timeout_secs", defaults::DB_ACQUIRE_TIMEOUT_SECS as i64)
}

/// Loads the application configuration.
///
/// Later layers override earlier ones:
/// 1. built-in [`defaults`]
/// 2. `config/default.toml`
/// 3. `config/{RUN_ENV}.toml` (`APP_ENV` is accepted too)
/// 4. `APP__*` environment variables, e.g. `APP__DATABASE_URL`
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| defaults::ENVIRONMENT.to_string());
    info!(environment = %run_env, "loading configuration");

    let config = with_defaults(&run_env)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    AppConfig::from_config(config).map_err(|e| {
        error!(error = %e, "invalid configuration");
        e
    })
}

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
pub fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("purchase_order_api={},tower_http=debug", level))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
