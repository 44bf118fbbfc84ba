//! Export module - CSV and JSON downloads of a user's entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DATE_FORMAT;
use crate::entries::{BudgetEntry, EntryType};
use crate::errors::{Error, Result};

pub const CSV_HEADER: [&str; 4] = ["Date", "Category", "Amount", "Type"];
pub const CSV_FILENAME: &str = "budget_entries.csv";

/// One exported entry. Field order matches the CSV columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub date: String,
    pub category: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

impl From<&BudgetEntry> for ExportRecord {
    fn from(entry: &BudgetEntry) -> Self {
        Self {
            date: format_date(entry.date),
            category: entry.category.clone(),
            amount: entry.amount,
            entry_type: entry.entry_type,
        }
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Renders entries as CSV with a `Date,Category,Amount,Type` header.
pub fn export_csv(entries: &[BudgetEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for entry in entries {
        writer.write_record([
            format_date(entry.date),
            entry.category.clone(),
            entry.amount.to_string(),
            entry.entry_type.as_str().to_string(),
        ])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Unexpected(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::Unexpected(e.to_string()))
}

/// Entries as a bare list of `{date, category, amount, type}` objects.
pub fn export_json(entries: &[BudgetEntry]) -> Vec<ExportRecord> {
    entries.iter().map(ExportRecord::from).collect()
}
