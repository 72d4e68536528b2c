//! Shared setup for database-backed tests
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p userstore-core -- --ignored

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;
use userstore_core::{create_pool, ensure_user_table, UserRepository};

pub async fn repo() -> UserRepository {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let pool = create_pool(&url).await.expect("pool creation failed");
    ensure_user_table(&pool).await.expect("schema bootstrap failed");

    UserRepository::new(pool)
}

/// Natural id that no other test run will use.
pub fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

/// Read `deleted_at` bypassing the soft-delete filter.
pub async fn raw_deleted_at(pool: &PgPool, idx: i32) -> Option<Option<DateTime<Utc>>> {
    sqlx::query_scalar("SELECT deleted_at FROM user_tb WHERE idx = $1")
        .bind(idx)
        .fetch_optional(pool)
        .await
        .expect("raw query failed")
}

/// Count rows with this natural id, deleted or not.
pub async fn raw_count(pool: &PgPool, id: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM user_tb WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("raw count failed")
}
