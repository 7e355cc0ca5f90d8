//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use quill_infra::DatabaseConfig;

/// Deployment environment, from `APP_ENV` (or `NODE_ENV`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Where records are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    /// Empty means any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            environment: Environment::default(),
            storage: StorageBackend::default(),
            database: DatabaseConfig::default(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let environment = env::var("APP_ENV")
            .or_else(|_| env::var("NODE_ENV"))
            .ok()
            .and_then(|v| parse_or_warn("APP_ENV", &v))
            .unwrap_or(defaults.environment);

        let db_defaults = DatabaseConfig::default();
        let database = DatabaseConfig {
            host: env::var("DB_HOST").unwrap_or(db_defaults.host),
            port: env_parse("DB_PORT").unwrap_or(db_defaults.port),
            username: env::var("DB_USERNAME").unwrap_or(db_defaults.username),
            password: env::var("DB_PASSWORD").unwrap_or(db_defaults.password),
            database: env::var("DB_DATABASE").unwrap_or(db_defaults.database),
            url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(db_defaults.max_connections),
            min_connections: env_parse("DB_MIN_CONNECTIONS").unwrap_or(db_defaults.min_connections),
            sql_logging: environment.is_development(),
        };

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT").unwrap_or(defaults.port),
            environment,
            storage: env_parse("STORAGE_BACKEND").unwrap_or(defaults.storage),
            database,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| parse_or_warn(key, &v))
}

fn parse_or_warn<T: FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!(key, value, "Ignoring invalid configuration value");
            None
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
