//! Auth module - registration, login, sessions and role checks.

mod auth_model;
mod auth_service;
mod auth_traits;
pub mod password;
pub mod tokens;

pub use auth_model::{Credentials, NewSession, Registration, Session};
pub use auth_service::{require_role, validate_email, AuthService};
pub use auth_traits::{AuthServiceTrait, SessionRepositoryTrait};
