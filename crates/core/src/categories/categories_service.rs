use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use super::categories_model::{AddCategoryOutcome, Category, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{DatabaseError, Error, Result, ValidationError};

const MAX_NAME_LEN: usize = 50;

pub struct CategoryService {
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(category_repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        CategoryService {
            category_repository,
        }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn list_categories(&self, user_id: i32) -> Result<Vec<Category>> {
        self.category_repository.list_categories(user_id)
    }

    fn category_names(&self, user_id: i32) -> Result<Vec<String>> {
        Ok(self
            .category_repository
            .list_categories(user_id)?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    async fn add_category(&self, user_id: i32, name: &str) -> Result<AddCategoryOutcome> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::field("new_category", "This field is required.").into());
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::field(
                "new_category",
                format!("Category names are limited to {MAX_NAME_LEN} characters."),
            )
            .into());
        }

        if self
            .category_repository
            .find_category(user_id, name)?
            .is_some()
        {
            warn!("Category '{}' already exists for user {}", name, user_id);
            return Ok(AddCategoryOutcome::Exists);
        }

        match self
            .category_repository
            .create_category(NewCategory {
                user_id,
                name: name.to_string(),
            })
            .await
        {
            Ok(category) => Ok(AddCategoryOutcome::Created(category)),
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                Ok(AddCategoryOutcome::Exists)
            }
            Err(e) => Err(e),
        }
    }
}
