//! Budget entry domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DATE_FORMAT, MAX_AMOUNT};
use crate::errors::{Error, FieldErrors, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryType {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            other => Err(ValidationError::field(
                "type",
                format!("'{other}' is not a valid choice."),
            )
            .into()),
        }
    }
}

/// Domain model representing one income or expense line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetEntry {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
}

/// Input model for creating a new entry
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudgetEntry {
    pub user_id: i32,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub entry_type: EntryType,
}

/// Replacement values for an existing entry
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetEntryUpdate {
    pub id: i32,
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub entry_type: EntryType,
}

/// Raw entry form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default, rename = "type")]
    pub entry_type: String,
}

/// Validated field values of an [`EntryForm`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedEntry {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub entry_type: EntryType,
}

impl EntryForm {
    /// Parses every field, collecting all problems instead of stopping at the first.
    /// `allowed_categories` is the owner's category list.
    pub(crate) fn parse(&self, allowed_categories: &[String]) -> Result<ParsedEntry> {
        let mut errors = FieldErrors::new();
        const REQUIRED: &str = "This field is required.";

        let date = match self.date.trim() {
            "" => {
                errors.add("date", REQUIRED);
                None
            }
            raw => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("date", "Not a valid date value.");
                    None
                }
            },
        };

        let category = self.category.trim();
        if category.is_empty() {
            errors.add("category", REQUIRED);
        } else if !allowed_categories.iter().any(|c| c == category) {
            errors.add("category", "Not a valid choice.");
        }

        let amount = match self.amount.trim() {
            "" => {
                errors.add("amount", REQUIRED);
                None
            }
            raw => match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
                Ok(amount) if amount.is_sign_negative() && !amount.is_zero() => {
                    errors.add("amount", "Amount must not be negative.");
                    None
                }
                Ok(amount) if amount > MAX_AMOUNT => {
                    errors.add("amount", format!("Amount must not exceed {MAX_AMOUNT}."));
                    None
                }
                Ok(amount) => Some(amount.normalize()),
                Err(_) => {
                    errors.add("amount", "Not a valid number.");
                    None
                }
            },
        };

        let entry_type = match self.entry_type.trim() {
            "" => {
                errors.add("type", REQUIRED);
                None
            }
            raw => match raw.parse::<EntryType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.add("type", "Not a valid choice.");
                    None
                }
            },
        };

        errors.into_result()?;
        match (date, amount, entry_type) {
            (Some(date), Some(amount), Some(entry_type)) => Ok(ParsedEntry {
                date,
                category: category.to_string(),
                amount,
                entry_type,
            }),
            _ => Err(Error::Unexpected(
                "entry form parsed without errors but with missing values".to_string(),
            )),
        }
    }
}

/// Raw dashboard filters from the query string.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EntryFilters {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Validated filters; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryQuery {
    pub category: Option<String>,
    pub entry_type: Option<EntryType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl TryFrom<&EntryFilters> for EntryQuery {
    type Error = Error;

    fn try_from(filters: &EntryFilters) -> Result<Self> {
        let mut errors = FieldErrors::new();
        let mut parse_date = |field: &str, value: &Option<String>| {
            non_empty(value).and_then(|raw| match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add(field, format!("'{raw}' is not a valid YYYY-MM-DD date."));
                    None
                }
            })
        };
        let start_date = parse_date("start_date", &filters.start_date);
        let end_date = parse_date("end_date", &filters.end_date);

        let entry_type = match non_empty(&filters.entry_type) {
            Some(raw) => match raw.parse::<EntryType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.add("type", format!("'{raw}' is not a valid entry type."));
                    None
                }
            },
            None => None,
        };

        errors.into_result()?;
        Ok(EntryQuery {
            category: non_empty(&filters.category).map(str::to_string),
            entry_type,
            start_date,
            end_date,
        })
    }
}
