//! Pool construction from `DatabaseConfig`
//!
//! The repository never builds its own pool. Callers create one here at
//! startup, hand it to `UserRepository::new`, and close it at shutdown.
//! The acquire timeout is the only deadline a repository call has; an
//! exhausted or unreachable pool surfaces as `UserRepoError::Database`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default wait for a free connection, in seconds.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// Pool options for `config`.
///
/// `max_connections = 0` would leave every call waiting out the acquire
/// timeout, so it is raised to 1.
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections.max(1))
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
}

/// Connect with default settings.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/userstore").await?;
/// let repo = UserRepository::new(pool);
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    connect_with_config(database_url, &DatabaseConfig::default()).await
}

/// Connect using the pool settings from `config`.
///
/// `config.url` is ignored; `StoreConfig::connect` resolves the url.
pub async fn connect_with_config(
    database_url: &str,
    config: &DatabaseConfig,
) -> Result<PgPool, sqlx::Error> {
    let pool = pool_options(config).connect(database_url).await?;

    tracing::info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout_secs,
        "user store pool ready"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_connections: u32, acquire_timeout_secs: u64) -> DatabaseConfig {
        DatabaseConfig {
            url: None,
            max_connections,
            acquire_timeout_secs,
        }
    }

    #[test]
    fn options_follow_config() {
        let options = pool_options(&config(12, 3));
        assert_eq!(options.get_max_connections(), 12);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn zero_connections_raised_to_one() {
        let options = pool_options(&config(0, 1));
        assert_eq!(options.get_max_connections(), 1);
    }

    #[tokio::test]
    async fn unreachable_database_fails() {
        let result =
            connect_with_config("postgres://userstore@127.0.0.1:1/userstore", &config(1, 1)).await;
        assert!(result.is_err());
    }

    // Run with: DATABASE_URL=postgres://... cargo test -p userstore-core -- --ignored
    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
