//! Admin dashboard models.

use serde::Serialize;

use crate::users::UserSummary;

/// How many entries across all users carry a category name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_entries: i64,
    pub total_categories: i64,
    pub top_categories: Vec<CategoryCount>,
    pub recent_users: Vec<UserSummary>,
    pub logs: String,
}
