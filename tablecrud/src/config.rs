//! Database configuration loaded with Figment
//!
//! Sources, highest precedence first:
//! 1. Environment variables (prefix: `TABLECRUD_`, e.g. `TABLECRUD_URL`)
//! 2. `./tablecrud.toml`, when present
//! 3. Default values

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CONFIG_FILE: &str = "tablecrud.toml";
pub const ENV_PREFIX: &str = "TABLECRUD_";

/// Connection pool and statement settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Maximum number of open connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum idle connections
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Idle connections are closed after this many seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Connections are recycled after this many seconds
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,

    /// Per-statement deadline for repositories built from this config
    #[serde(default)]
    pub statement_timeout_ms: Option<u64>,

    /// Let sqlx log every statement itself
    #[serde(default)]
    pub sqlx_logging: bool,
}

fn default_url() -> String {
    "sqlite::memory:".to_string()
}

fn default_max_connections() -> u32 {
    100
}

fn default_min_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_max_lifetime() -> u64 {
    3600
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            statement_timeout_ms: None,
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Defaults, then `tablecrud.toml`, then `TABLECRUD_*` variables.
    ///
    /// # Errors
    ///
    /// Returns a figment error when a source holds a value of the wrong type.
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX)),
        )
    }

    /// Extract from a caller-built figment layered on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns a figment error when a source holds a value of the wrong type.
    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(figment)
            .extract()
    }

    #[must_use]
    pub fn statement_timeout(&self) -> Option<Duration> {
        self.statement_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn connect_options(&self) -> ConnectOptions {
        let mut options = ConnectOptions::new(self.url.clone());
        options
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging);
        options
    }

    /// Open the pool. Call once at startup and hand the connection to every repository.
    ///
    /// # Errors
    ///
    /// Returns the driver error when the database cannot be reached.
    pub async fn connect(&self) -> Result<DatabaseConnection, DbErr> {
        tracing::info!(
            max_connections = self.max_connections,
            min_connections = self.min_connections,
            "Connecting to database"
        );
        Database::connect(self.connect_options()).await
    }
}
