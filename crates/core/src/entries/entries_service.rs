use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use super::entries_model::{
    BudgetEntry, BudgetEntryUpdate, EntryFilters, EntryForm, EntryQuery, NewBudgetEntry,
};
use super::entries_traits::{EntryRepositoryTrait, EntryServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};

pub struct EntryService {
    entry_repository: Arc<dyn EntryRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl EntryService {
    pub fn new(
        entry_repository: Arc<dyn EntryRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        EntryService {
            entry_repository,
            category_repository,
        }
    }

    fn category_names(&self, user_id: i32) -> Result<Vec<String>> {
        Ok(self
            .category_repository
            .list_categories(user_id)?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }
}

#[async_trait]
impl EntryServiceTrait for EntryService {
    fn list_entries(&self, user_id: i32, filters: &EntryFilters) -> Result<Vec<BudgetEntry>> {
        let query = EntryQuery::try_from(filters)?;
        self.entry_repository.list_entries(user_id, &query)
    }

    fn get_owned_entry(&self, user_id: i32, entry_id: i32) -> Result<BudgetEntry> {
        let entry = self
            .entry_repository
            .get_entry(entry_id)?
            .ok_or_else(|| Error::NotFound(format!("Entry {entry_id} does not exist")))?;
        if entry.user_id != user_id {
            warn!(
                "User {} attempted to access entry {} owned by user {}",
                user_id, entry_id, entry.user_id
            );
            return Err(Error::Forbidden(
                "You are not authorized to modify this entry.".to_string(),
            ));
        }
        Ok(entry)
    }

    async fn add_entry(&self, user_id: i32, form: EntryForm) -> Result<BudgetEntry> {
        let parsed = form.parse(&self.category_names(user_id)?)?;
        self.entry_repository
            .create_entry(NewBudgetEntry {
                user_id,
                date: parsed.date,
                category: parsed.category,
                amount: parsed.amount,
                entry_type: parsed.entry_type,
            })
            .await
    }

    async fn edit_entry(
        &self,
        user_id: i32,
        entry_id: i32,
        form: EntryForm,
    ) -> Result<BudgetEntry> {
        let entry = self.get_owned_entry(user_id, entry_id)?;
        let parsed = form.parse(&self.category_names(user_id)?)?;
        self.entry_repository
            .update_entry(BudgetEntryUpdate {
                id: entry.id,
                date: parsed.date,
                category: parsed.category,
                amount: parsed.amount,
                entry_type: parsed.entry_type,
            })
            .await
    }

    async fn delete_entry(&self, user_id: i32, entry_id: i32) -> Result<()> {
        let entry = self.get_owned_entry(user_id, entry_id)?;
        self.entry_repository.delete_entry(entry.id).await?;
        Ok(())
    }
}
