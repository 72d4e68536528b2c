//! SET-clause builder for partial user updates
//!
//! Collects `(column, value)` pairs from an `UpdateUser` in a fixed order
//! (`nickname`, `id`, `pw`) and renders them through `sqlx::QueryBuilder`,
//! so every value gets its own bind and the separator is never hand-managed.

use sqlx::{Postgres, QueryBuilder};

use crate::error::{Result, UserRepoError};
use crate::models::UpdateUser;

/// Ordered column assignments for `UPDATE user_tb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAssignments {
    assignments: Vec<(&'static str, String)>,
}

impl UserAssignments {
    /// Collect the fields present on `update`.
    ///
    /// # Errors
    ///
    /// `UserRepoError::EmptyUpdate` when no field would be written.
    pub fn from_update(update: &UpdateUser) -> Result<Self> {
        let assignments: Vec<_> = update
            .present_fields()
            .map(|(column, value)| (column, value.to_owned()))
            .collect();

        if assignments.is_empty() {
            return Err(UserRepoError::EmptyUpdate);
        }

        Ok(Self { assignments })
    }

    /// Columns in the order they appear in the statement.
    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments.iter().map(|(column, _)| *column).collect()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Render `UPDATE user_tb SET ... WHERE idx = $n`.
    ///
    /// Values are bound `$1..$len` in assignment order; `idx` is bound last.
    pub fn into_query(self, idx: i32) -> QueryBuilder<'static, Postgres> {
        let mut builder = QueryBuilder::new("UPDATE user_tb SET ");

        {
            let mut set = builder.separated(", ");
            for (column, value) in self.assignments {
                set.push(column);
                set.push_unseparated(" = ");
                set.push_bind_unseparated(value);
            }
        }

        builder.push(" WHERE idx = ").push_bind(idx);
        builder
    }
}
