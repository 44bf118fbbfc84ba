//! Database models for budget entries.
//!
//! Dates are stored as `YYYY-MM-DD` text so lexical order is calendar order.
//! Amounts are stored as decimal text to avoid float rounding.

use std::str::FromStr;

use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;
use smartbudget_core::constants::DATE_FORMAT;
use smartbudget_core::entries::{BudgetEntry, BudgetEntryUpdate, EntryType, NewBudgetEntry};

use crate::errors::StorageError;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetEntryDB {
    pub id: i32,
    pub user_id: i32,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub entry_type: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_entries)]
pub struct NewBudgetEntryDB {
    pub user_id: i32,
    pub date: String,
    pub category: String,
    pub amount: String,
    pub entry_type: String,
}

/// Columns replaced by an edit. Ownership never changes.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::budget_entries)]
pub struct BudgetEntryChangeset {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub entry_type: String,
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl TryFrom<BudgetEntryDB> for BudgetEntry {
    type Error = StorageError;

    fn try_from(db: BudgetEntryDB) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&db.date, DATE_FORMAT).map_err(|e| {
            StorageError::InvalidData(format!("entry {} has date '{}': {e}", db.id, db.date))
        })?;
        let amount = Decimal::from_str(&db.amount).map_err(|e| {
            StorageError::InvalidData(format!("entry {} has amount '{}': {e}", db.id, db.amount))
        })?;
        let entry_type = EntryType::from_str(&db.entry_type).map_err(|_| {
            StorageError::InvalidData(format!("entry {} has type '{}'", db.id, db.entry_type))
        })?;

        Ok(Self {
            id: db.id,
            user_id: db.user_id,
            date,
            category: db.category,
            amount,
            entry_type,
        })
    }
}

impl From<NewBudgetEntry> for NewBudgetEntryDB {
    fn from(domain: NewBudgetEntry) -> Self {
        Self {
            user_id: domain.user_id,
            date: format_date(domain.date),
            category: domain.category,
            amount: domain.amount.to_string(),
            entry_type: domain.entry_type.as_str().to_string(),
        }
    }
}

impl From<BudgetEntryUpdate> for BudgetEntryChangeset {
    fn from(domain: BudgetEntryUpdate) -> Self {
        Self {
            date: format_date(domain.date),
            category: domain.category,
            amount: domain.amount.to_string(),
            entry_type: domain.entry_type.as_str().to_string(),
        }
    }
}
