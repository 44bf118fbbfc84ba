use crate::entries::entries_model::{
    BudgetEntry, BudgetEntryUpdate, EntryFilters, EntryForm, EntryQuery, NewBudgetEntry,
};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for budget entry repository operations
#[async_trait]
pub trait EntryRepositoryTrait: Send + Sync {
    fn get_entry(&self, entry_id: i32) -> Result<Option<BudgetEntry>>;

    /// Entries of one user matching `query`, newest date first.
    fn list_entries(&self, user_id: i32, query: &EntryQuery) -> Result<Vec<BudgetEntry>>;

    async fn create_entry(&self, new_entry: NewBudgetEntry) -> Result<BudgetEntry>;
    async fn update_entry(&self, entry_update: BudgetEntryUpdate) -> Result<BudgetEntry>;
    async fn delete_entry(&self, entry_id: i32) -> Result<usize>;
}

/// Trait for budget entry service operations
#[async_trait]
pub trait EntryServiceTrait: Send + Sync {
    fn list_entries(&self, user_id: i32, filters: &EntryFilters) -> Result<Vec<BudgetEntry>>;
    fn get_owned_entry(&self, user_id: i32, entry_id: i32) -> Result<BudgetEntry>;
    async fn add_entry(&self, user_id: i32, form: EntryForm) -> Result<BudgetEntry>;
    async fn edit_entry(&self, user_id: i32, entry_id: i32, form: EntryForm)
        -> Result<BudgetEntry>;
    async fn delete_entry(&self, user_id: i32, entry_id: i32) -> Result<()>;
}
