//! SQLite storage implementation for SmartBudget.
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! It implements the repository traits defined in `smartbudget-core`:
//! - Database connection pooling and management
//! - Embedded Diesel migrations
//! - Repository implementations for users, sessions, categories, entries and admin stats
//! - Database-specific model types (with Diesel derives)

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod admin;
pub mod categories;
pub mod entries;
pub mod sessions;
pub mod users;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use admin::AdminRepository;
pub use categories::CategoryRepository;
pub use entries::EntryRepository;
pub use sessions::SessionRepository;
pub use users::UserRepository;

// Re-export from smartbudget-core for convenience
pub use smartbudget_core::errors::{DatabaseError, Error, Result};
