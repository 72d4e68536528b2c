//! Domain models for the user table
//!
//! `User` is the persisted row shape; `InsertUser` and `UpdateUser` are
//! write intents that carry only the values a caller wants to store.

pub mod user;
pub mod validation;

pub use user::{InsertUser, UpdateUser, User, UserKey};
pub use validation::ValidationError;
