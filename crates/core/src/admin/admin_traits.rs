use crate::admin::admin_model::{AdminStats, CategoryCount};
use crate::errors::Result;
use crate::users::{User, UserSummary};

/// Read-only aggregate queries across all users
pub trait AdminRepositoryTrait: Send + Sync {
    fn count_users(&self) -> Result<i64>;
    fn count_entries(&self) -> Result<i64>;
    fn count_distinct_category_names(&self) -> Result<i64>;

    /// Most frequent entry categories, highest count first, ties by name.
    fn top_categories(&self, limit: i64) -> Result<Vec<CategoryCount>>;

    /// Most recently created users, highest id first.
    fn recent_users(&self, limit: i64) -> Result<Vec<UserSummary>>;
}

/// Trait for admin service operations. Every call checks the admin role.
pub trait AdminServiceTrait: Send + Sync {
    fn stats(&self, acting_user: &User) -> Result<AdminStats>;
    fn view_logs(&self, acting_user: &User) -> Result<String>;
}
