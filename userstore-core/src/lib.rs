//! userstore-core: PostgreSQL data access for user records
//!
//! Lookup by surrogate key (`idx`) or natural id, insert, partial update
//! and soft delete on `user_tb`. Soft-deleted rows are invisible to every
//! read. Each operation can run on a caller-supplied connection or
//! transaction, so several calls can commit or roll back together:
//!
//! ```ignore
//! let repo = UserRepository::new(pool.clone());
//!
//! let mut tx = pool.begin().await?;
//! let user = repo.insert_with(&mut *tx, &InsertUser::new("alice", "Alice", hash)).await?;
//! repo.update_by_idx_with(&mut *tx, user.idx, &UpdateUser::new().nickname("Alicia")).await?;
//! tx.commit().await?;
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use config::{ConfigError, DatabaseConfig, StoreConfig};
pub use db::{
    create_pool, ensure_user_table, UserAssignments, UserRepository, USER_ID_ACTIVE_INDEX,
};
pub use error::{Result, UserRepoError};
pub use models::{InsertUser, UpdateUser, User, UserKey, ValidationError};
