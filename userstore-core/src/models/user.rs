//! User record and write intents

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// One row of `user_tb`.
///
/// `deleted_at` being set means the row is soft-deleted; the repository
/// never returns such rows from its lookups.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub idx: i32,
    pub id: String,
    pub pw: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Values required to create a user.
///
/// `pw` is stored as given; hashing happens before it reaches this layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertUser {
    pub id: String,
    pub nickname: String,
    pub pw: String,
}

impl InsertUser {
    pub fn new(id: impl Into<String>, nickname: impl Into<String>, pw: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nickname: nickname.into(),
            pw: pw.into(),
        }
    }

    /// Check that every field is non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [("id", &self.id), ("nickname", &self.nickname), ("pw", &self.pw)] {
            if value.is_empty() {
                return Err(ValidationError::Empty { field });
            }
        }
        Ok(())
    }
}

/// Partial update of a user.
///
/// A field is applied only when it is `Some` and non-empty; `Some("")`
/// is treated the same as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub pw: Option<String>,
}

impl UpdateUser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    pub fn pw(mut self, pw: impl Into<String>) -> Self {
        self.pw = Some(pw.into());
        self
    }

    /// The natural id this update would set, if any.
    pub fn new_id(&self) -> Option<&str> {
        present(&self.id)
    }

    /// Fields that would be written, in statement order.
    pub fn present_fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("nickname", present(&self.nickname)),
            ("id", present(&self.id)),
            ("pw", present(&self.pw)),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|v| (column, v)))
    }

    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.present_fields().next().is_none()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Key used to look a user up, for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Idx(i32),
    Id(String),
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idx(idx) => write!(f, "idx {}", idx),
            Self::Id(id) => write!(f, "id '{}'", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn insert_requires_all_fields() {
        assert!(InsertUser::new("alice", "Alice", "hash1").validate().is_ok());

        let err = InsertUser::new("", "Alice", "hash1").validate().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "id" });

        let err = InsertUser::new("alice", "", "hash1").validate().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "nickname" });

        let err = InsertUser::new("alice", "Alice", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "pw" });
    }

    #[test]
    fn update_fields_in_statement_order() {
        let update = UpdateUser::new().pw("hash2").id("bob").nickname("Bob");
        let fields: Vec<_> = update.present_fields().collect();
        assert_eq!(
            fields,
            vec![("nickname", "Bob"), ("id", "bob"), ("pw", "hash2")]
        );
    }

    #[test]
    fn empty_strings_are_absent() {
        let update = UpdateUser::new().nickname("").id("");
        assert!(update.is_empty());
        assert_eq!(update.new_id(), None);

        let update = UpdateUser::new().nickname("").pw("hash2");
        let fields: Vec<_> = update.present_fields().collect();
        assert_eq!(fields, vec![("pw", "hash2")]);
    }

    #[test]
    fn default_update_is_empty() {
        assert!(UpdateUser::default().is_empty());
    }

    #[test]
    fn update_deserializes_missing_fields() {
        let update: UpdateUser = serde_json::from_str(r#"{"nickname":"Alicia"}"#).unwrap();
        assert_eq!(update, UpdateUser::new().nickname("Alicia"));
    }

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            idx: 1,
            id: "alice".into(),
            pw: "hash1".into(),
            nickname: "Alice".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 14, 12, 0, 0).unwrap(),
            deleted_at: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["createdAt"], "2025-01-14T12:00:00Z");
        assert!(json["deletedAt"].is_null());
        assert!(!user.is_deleted());
    }

    #[test]
    fn key_display() {
        assert_eq!(UserKey::Idx(7).to_string(), "idx 7");
        assert_eq!(UserKey::Id("alice".into()).to_string(), "id 'alice'");
    }
}
