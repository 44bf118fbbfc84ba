//! Category domain models.

use serde::{Deserialize, Serialize};

/// Domain model representing a category owned by one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
}

/// Input model for creating a new category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub user_id: i32,
    pub name: String,
}

/// Result of adding a category: names are unique per user, so adding an
/// existing one is a no-op.
#[derive(Debug, Clone, PartialEq)]
pub enum AddCategoryOutcome {
    Created(Category),
    Exists,
}
