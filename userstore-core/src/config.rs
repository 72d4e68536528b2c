use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::db::{self, pool::DEFAULT_ACQUIRE_TIMEOUT_SECS, pool::DEFAULT_MAX_CONNECTIONS};

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no database url configured (set DATABASE_URL or [database].url)")]
    MissingDatabaseUrl,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to connect: {0}")]
    Connect(#[from] sqlx::Error),
}

/// Load environment variables from .env files
///
/// Priority order (highest to lowest):
/// 1. Environment variables already set
/// 2. Current directory .env
/// 3. ~/.userstore/.env
///
/// dotenvy never overwrites a variable that is already set.
pub fn load_dotenv() {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded .env from current directory: {}", path.display());
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        if env_file.exists() {
            match dotenvy::from_path(&env_file) {
                Ok(()) => {
                    debug!("Loaded .env from {}", env_file.display());
                    loaded_from.push(env_file);
                }
                Err(e) => debug!("Failed to load {}: {}", env_file.display(), e),
            }
        }
    }

    if loaded_from.is_empty() {
        debug!("No .env files found, using environment variables only");
    }
}

/// Get the userstore config directory path (~/.userstore)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".userstore"))
}

/// TOML configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string; `DATABASE_URL` takes precedence
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds a call waits for a free connection before failing
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_acquire_timeout_secs() -> u64 {
    DEFAULT_ACQUIRE_TIMEOUT_SECS
}

impl StoreConfig {
    /// Load config from .env files, TOML files and the environment
    ///
    /// Priority order (highest to lowest):
    /// 1. DATABASE_URL environment variable
    /// 2. ./userstore.toml (project-specific)
    /// 3. ~/.userstore/config.toml (user defaults)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        load_dotenv();

        let mut config = Self::default();

        if let Some(global) = config_dir().map(|dir| dir.join("config.toml")) {
            if let Some(global_config) = Self::load_optional(&global) {
                config = global_config;
            }
        }

        if let Some(local_config) = Self::load_optional(Path::new("userstore.toml")) {
            config = local_config;
        }

        let config = config.with_url_override(std::env::var("DATABASE_URL").ok());
        info!(
            max_connections = config.database.max_connections,
            has_url = config.database.url.is_some(),
            "configuration loaded"
        );
        config
    }

    /// Read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Missing files are skipped quietly; broken ones are skipped with a warning.
    fn load_optional(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match Self::from_file(path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path.display(), e);
                None
            }
        }
    }

    fn with_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.is_empty()) {
            self.database.url = Some(url);
        }
        self
    }

    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)
    }

    /// Build a pool from this configuration.
    ///
    /// The caller owns the pool and closes it at shutdown.
    pub async fn connect(&self) -> Result<PgPool, ConfigError> {
        let url = self.database_url()?;
        Ok(db::connect_with_config(url, &self.database).await?)
    }
}
