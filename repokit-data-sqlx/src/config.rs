//! Connection settings loaded from YAML, `.env` and the environment.
//!
//! Resolution order (lowest to highest priority):
//! 1. a YAML file, either flat or under a `database:` section
//! 2. `.env` (loaded into the process environment)
//! 3. `DATABASE_URL` / `DATABASE_MAX_CONNECTIONS`

use std::path::Path;
use std::time::Duration;

use repokit_data::{Entity, Identifier, Store, UltimateRepository};
use serde::Deserialize;
use sqlx::pool::PoolOptions;
use sqlx::{ConnectOptions, Connection, Database};
use tracing::{debug, info};

use crate::store::SqlxStore;

/// Errors raised while loading or applying a [`DataConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
    /// A value was present but unusable.
    Invalid { key: &'static str, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
            ConfigError::Invalid { key, message } => {
                write!(f, "Invalid config value for '{key}': {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn default_url() -> String {
    "sqlite::memory:".into()
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

/// Pool and repository settings.
///
/// ```yaml
/// database:
///   url: sqlite://app.db
///   max_connections: 10
///   eager: true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default)]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    /// Build eager repositories (association preloading on every fetch).
    #[serde(default)]
    pub eager: bool,
    /// Keep the driver's own statement logging on.
    #[serde(default)]
    pub log_statements: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
            min_connections: 0,
            acquire_timeout_secs: default_acquire_timeout_secs(),
            eager: false,
            log_statements: false,
        }
    }
}

#[derive(Deserialize)]
struct Sectioned {
    database: DataConfig,
}

impl DataConfig {
    /// Parse YAML, accepting either a `database:` section or a flat mapping.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
        if yaml.is_null() {
            return Ok(Self::default());
        }
        let config = if yaml.get("database").is_some() {
            serde_yaml::from_value::<Sectioned>(yaml).map(|s| s.database)
        } else {
            serde_yaml::from_value::<Self>(yaml)
        };
        config.map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no database config file, using defaults");
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_yaml_str(&content)
    }

    /// Apply `.env` and environment overrides on top of `self`.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.url = url;
        }
        if let Ok(raw) = std::env::var("DATABASE_MAX_CONNECTIONS") {
            self.max_connections = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                message: format!("{raw:?}: {e}"),
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// File, then `.env`, then environment.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml_file(path)?.apply_env()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "url",
                message: "must not be empty".into(),
            });
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "max_connections",
                message: "must be at least 1".into(),
            });
        }
        if self.min_connections > self.max_connections {
            return Err(ConfigError::Invalid {
                key: "min_connections",
                message: format!(
                    "{} exceeds max_connections ({})",
                    self.min_connections, self.max_connections
                ),
            });
        }
        Ok(())
    }

    /// Open a pool with these settings and wrap it in a store for `T`.
    pub async fn connect<T, DB>(&self) -> Result<SqlxStore<T, DB>, sqlx::Error>
    where
        DB: Database,
    {
        let mut options = self
            .url
            .parse::<<DB::Connection as Connection>::Options>()?;
        if !self.log_statements {
            options = options.disable_statement_logging();
        }
        let pool = PoolOptions::<DB>::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .connect_with(options)
            .await?;
        info!(
            database = DB::NAME,
            max_connections = self.max_connections,
            "database pool ready"
        );
        Ok(SqlxStore::new(pool))
    }

    /// Build a repository over `store`, eager when [`DataConfig::eager`] is set.
    pub fn repository<T, Id, S>(&self, store: S) -> UltimateRepository<T, Id, S>
    where
        T: Entity + Send + 'static,
        Id: Identifier,
        S: Store<T> + Clone,
    {
        if self.eager {
            UltimateRepository::eager(store)
        } else {
            UltimateRepository::new(store)
        }
    }
}
