//! Bootstrap DDL for `user_tb`
//!
//! Creates the table and its partial unique index on fresh databases.
//! There is no versioning here; existing tables are left as they are.

use sqlx::PgPool;

/// Partial unique index on `id` among active rows.
///
/// A unique violation is reported as `DuplicateId` only when this index fires.
pub const USER_ID_ACTIVE_INDEX: &str = "user_tb_id_active_key";

/// Advisory lock key serializing concurrent bootstraps.
const SCHEMA_LOCK_KEY: i64 = 0x7573_6572_5f74_62; // "user_tb"

/// Create `user_tb` and its indexes if they do not exist.
pub async fn ensure_user_table(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    // CREATE ... IF NOT EXISTS still races on the catalog without this
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_tb (
            idx INTEGER GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            id TEXT NOT NULL,
            pw TEXT NOT NULL,
            nickname TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    // Natural id is unique among active rows only, so a deleted id can be reused
    let create_index = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {USER_ID_ACTIVE_INDEX} ON user_tb (id) WHERE deleted_at IS NULL"
    );
    sqlx::query(&create_index).execute(&mut *tx).await?;

    tx.commit().await?;
    tracing::info!("user_tb schema ready");
    Ok(())
}
