//! SmartBudget Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for SmartBudget.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod admin;
pub mod audit;
pub mod auth;
pub mod categories;
pub mod constants;
pub mod entries;
pub mod errors;
pub mod export;
pub mod summary;
pub mod users;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
