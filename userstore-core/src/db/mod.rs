//! Database layer - connection pool, schema bootstrap, and repositories
//!
//! # Design Principles
//!
//! - The pool is injected, never a global
//! - Transactions belong to the caller; repositories accept any `PgExecutor`
//! - Rely on DB constraints, map conflicts - no check-then-insert
//! - Soft delete is a filter on every read

pub mod pool;
pub mod repos;
pub mod schema;

pub use pool::{connect_with_config, create_pool, pool_options};
pub use repos::*;
pub use schema::{ensure_user_table, USER_ID_ACTIVE_INDEX};
