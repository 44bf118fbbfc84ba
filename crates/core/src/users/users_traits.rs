use crate::errors::Result;
use crate::users::users_model::{NewUser, Role, User};
use async_trait::async_trait;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_user(&self, user_id: i32) -> Result<Option<User>>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Inserts the user and its starter categories in one transaction.
    async fn create_user_with_categories(
        &self,
        new_user: NewUser,
        categories: Vec<String>,
    ) -> Result<User>;

    async fn update_role(&self, email: String, role: Role) -> Result<usize>;

    /// Removes the user's entries, categories and sessions, then the user row.
    /// All or nothing.
    async fn delete_user_cascade(&self, user_id: i32) -> Result<()>;
}
