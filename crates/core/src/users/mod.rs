//! Users module - domain models and repository trait.

mod users_model;
mod users_traits;

pub use users_model::{NewUser, Role, User, UserSummary};
pub use users_traits::UserRepositoryTrait;
