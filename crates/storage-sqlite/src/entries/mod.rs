//! SQLite storage implementation for budget entries.

mod model;
mod repository;

pub use model::{BudgetEntryDB, NewBudgetEntryDB};
pub use repository::EntryRepository;
