use std::sync::Arc;

use diesel::dsl::{count, count_distinct, count_star};
use diesel::prelude::*;

use smartbudget_core::admin::{AdminRepositoryTrait, CategoryCount};
use smartbudget_core::users::UserSummary;
use smartbudget_core::Result;

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::{budget_entries, categories, users};
use crate::users::UserDB;

/// Read-only; aggregates never go through the writer.
pub struct AdminRepository {
    pool: Arc<DbPool>,
}

impl AdminRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        AdminRepository { pool }
    }
}

impl AdminRepositoryTrait for AdminRepository {
    fn count_users(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(users::table
            .select(count_star())
            .first::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn count_entries(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(budget_entries::table
            .select(count_star())
            .first::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn count_distinct_category_names(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .select(count_distinct(categories::name))
            .first::<i64>(&mut conn)
            .map_err(StorageError::from)?)
    }

    fn top_categories(&self, limit: i64) -> Result<Vec<CategoryCount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budget_entries::table
            .group_by(budget_entries::category)
            .select((budget_entries::category, count(budget_entries::id)))
            .order((
                count(budget_entries::id).desc(),
                budget_entries::category.asc(),
            ))
            .limit(limit)
            .load::<(String, i64)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect())
    }

    fn recent_users(&self, limit: i64) -> Result<Vec<UserSummary>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .order(users::id.desc())
            .limit(limit)
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(UserSummary::from).collect())
    }
}
