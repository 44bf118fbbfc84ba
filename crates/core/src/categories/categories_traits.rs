use crate::categories::categories_model::{AddCategoryOutcome, Category, NewCategory};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for category repository operations
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn list_categories(&self, user_id: i32) -> Result<Vec<Category>>;
    fn find_category(&self, user_id: i32, name: &str) -> Result<Option<Category>>;
    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;
}

/// Trait for category service operations
#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn list_categories(&self, user_id: i32) -> Result<Vec<Category>>;
    fn category_names(&self, user_id: i32) -> Result<Vec<String>>;
    async fn add_category(&self, user_id: i32, name: &str) -> Result<AddCategoryOutcome>;
}
