//! User repository
//!
//! Handles `user_tb` access with these rules:
//! - every read filters `deleted_at IS NULL`
//! - every operation has a `*_with` form taking any `PgExecutor`, so callers
//!   can thread one transaction through several calls
//! - the repository never begins, commits, or rolls back a transaction
//! - only the active-id unique index surfaces as `DuplicateId`

use sqlx::{PgExecutor, PgPool};

use super::UserAssignments;
use crate::error::{Result, UserRepoError};
use crate::models::{InsertUser, UpdateUser, User, UserKey};

const SELECT_ACTIVE_BY_IDX: &str = r#"
    SELECT idx, id, pw, nickname, created_at, deleted_at
    FROM user_tb
    WHERE idx = $1
    AND deleted_at IS NULL
"#;

const SELECT_ACTIVE_BY_ID: &str = r#"
    SELECT idx, id, pw, nickname, created_at, deleted_at
    FROM user_tb
    WHERE id = $1
    AND deleted_at IS NULL
"#;

const INSERT_USER: &str = r#"
    INSERT INTO user_tb (id, nickname, pw)
    VALUES ($1, $2, $3)
    RETURNING idx, id, pw, nickname, created_at, deleted_at
"#;

const SOFT_DELETE_BY_IDX: &str = r#"
    UPDATE user_tb
    SET deleted_at = NOW()
    WHERE idx = $1
"#;

/// User repository
///
/// Cheap to clone; the pool is reference-counted.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The pool used by the convenience methods.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find an active user by surrogate key.
    pub async fn find_by_idx(&self, idx: i32) -> Result<Option<User>> {
        self.find_by_idx_with(&self.pool, idx).await
    }

    /// Find an active user by surrogate key on the given executor.
    ///
    /// Returns `None` when no row matches or the row is soft-deleted.
    #[tracing::instrument(level = "debug", skip(self, executor))]
    pub async fn find_by_idx_with<'e, E>(&self, executor: E, idx: i32) -> Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(SELECT_ACTIVE_BY_IDX)
            .bind(idx)
            .fetch_optional(executor)
            .await?;

        if user.is_none() {
            tracing::debug!("no active user");
        }
        Ok(user)
    }

    /// Find an active user by natural id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.find_by_id_with(&self.pool, id).await
    }

    /// Find an active user by natural id on the given executor.
    ///
    /// The partial unique index guarantees at most one active match.
    #[tracing::instrument(level = "debug", skip(self, executor))]
    pub async fn find_by_id_with<'e, E>(&self, executor: E, id: &str) -> Result<Option<User>>
    where
        E: PgExecutor<'e>,
    {
        let user = sqlx::query_as::<_, User>(SELECT_ACTIVE_BY_ID)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        if user.is_none() {
            tracing::debug!("no active user");
        }
        Ok(user)
    }

    /// Like `find_by_idx`, but absence is `UserRepoError::NotFound`.
    pub async fn get_by_idx(&self, idx: i32) -> Result<User> {
        self.get_by_idx_with(&self.pool, idx).await
    }

    pub async fn get_by_idx_with<'e, E>(&self, executor: E, idx: i32) -> Result<User>
    where
        E: PgExecutor<'e>,
    {
        self.find_by_idx_with(executor, idx)
            .await?
            .ok_or(UserRepoError::NotFound(UserKey::Idx(idx)))
    }

    /// Like `find_by_id`, but absence is `UserRepoError::NotFound`.
    pub async fn get_by_id(&self, id: &str) -> Result<User> {
        self.get_by_id_with(&self.pool, id).await
    }

    pub async fn get_by_id_with<'e, E>(&self, executor: E, id: &str) -> Result<User>
    where
        E: PgExecutor<'e>,
    {
        self.find_by_id_with(executor, id)
            .await?
            .ok_or_else(|| UserRepoError::NotFound(UserKey::Id(id.to_owned())))
    }

    /// Insert a user and return the stored row.
    pub async fn insert(&self, user: &InsertUser) -> Result<User> {
        self.insert_with(&self.pool, user).await
    }

    /// Insert a user on the given executor.
    ///
    /// `idx` and `created_at` come back from the same statement via RETURNING.
    ///
    /// # Errors
    ///
    /// - `Invalid` if any field is empty (nothing is sent to storage)
    /// - `DuplicateId` if an active user already has this id
    #[tracing::instrument(level = "debug", skip(self, executor, user), fields(id = %user.id))]
    pub async fn insert_with<'e, E>(&self, executor: E, user: &InsertUser) -> Result<User>
    where
        E: PgExecutor<'e>,
    {
        user.validate()?;

        let created = sqlx::query_as::<_, User>(INSERT_USER)
            .bind(&user.id)
            .bind(&user.nickname)
            .bind(&user.pw)
            .fetch_one(executor)
            .await
            .map_err(|err| UserRepoError::from_write(err, Some(&user.id)))
            .inspect_err(|err| {
                if err.is_duplicate() {
                    tracing::warn!("user id already taken");
                }
            })?;

        tracing::debug!(idx = created.idx, "user created");
        Ok(created)
    }

    /// Apply a partial update by surrogate key.
    pub async fn update_by_idx(&self, idx: i32, update: &UpdateUser) -> Result<()> {
        self.update_by_idx_with(&self.pool, idx, update).await
    }

    /// Apply a partial update on the given executor.
    ///
    /// Only fields present on `update` are written. The row's deletion state
    /// is not checked, and the affected row count is not reported: updating a
    /// missing or soft-deleted idx is not an error.
    ///
    /// # Errors
    ///
    /// - `EmptyUpdate` if no field is set (nothing is sent to storage)
    /// - `DuplicateId` if the new id is taken by another active user
    #[tracing::instrument(level = "debug", skip(self, executor, update))]
    pub async fn update_by_idx_with<'e, E>(
        &self,
        executor: E,
        idx: i32,
        update: &UpdateUser,
    ) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        let assignments = UserAssignments::from_update(update)?;
        tracing::debug!(columns = ?assignments.columns(), "updating user");

        let mut query = assignments.into_query(idx);
        query
            .build()
            .execute(executor)
            .await
            .map_err(|err| UserRepoError::from_write(err, update.new_id()))
            .inspect_err(|err| {
                if err.is_duplicate() {
                    tracing::warn!("user id already taken");
                }
            })?;

        Ok(())
    }

    /// Soft-delete a user by surrogate key.
    ///
    /// There is no pool-backed form: the caller always names the connection
    /// or transaction. `deleted_at` is stamped with the database clock;
    /// repeating the call re-stamps it.
    #[tracing::instrument(level = "debug", skip(self, executor))]
    pub async fn soft_delete_by_idx<'e, E>(&self, executor: E, idx: i32) -> Result<()>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(SOFT_DELETE_BY_IDX)
            .bind(idx)
            .execute(executor)
            .await?;

        Ok(())
    }
}
