//! Categories module - per-user category names.

mod categories_model;
mod categories_service;
mod categories_traits;

pub use categories_model::{AddCategoryOutcome, Category, NewCategory};
pub use categories_service::CategoryService;
pub use categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
