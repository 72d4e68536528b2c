//! Repository implementations for database access

pub mod assignments;
pub mod users;

pub use assignments::UserAssignments;
pub use users::UserRepository;
