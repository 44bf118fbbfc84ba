//! Entries module - budget entries, filters and ownership checks.

mod entries_model;
mod entries_service;
mod entries_traits;

pub use entries_model::{
    BudgetEntry, BudgetEntryUpdate, EntryFilters, EntryForm, EntryQuery, EntryType,
    NewBudgetEntry,
};
pub use entries_service::EntryService;
pub use entries_traits::{EntryRepositoryTrait, EntryServiceTrait};
