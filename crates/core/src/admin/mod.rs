//! Admin module - cross-user statistics and audit log viewing.

mod admin_model;
mod admin_service;
mod admin_traits;

pub use admin_model::{AdminStats, CategoryCount};
pub use admin_service::AdminService;
pub use admin_traits::{AdminRepositoryTrait, AdminServiceTrait};
