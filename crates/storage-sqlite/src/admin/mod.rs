//! SQLite queries backing the admin dashboard.

mod repository;

pub use repository::AdminRepository;
