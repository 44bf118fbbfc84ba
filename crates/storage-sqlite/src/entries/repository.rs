use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use smartbudget_core::entries::{
    BudgetEntry, BudgetEntryUpdate, EntryQuery, EntryRepositoryTrait, NewBudgetEntry,
};
use smartbudget_core::Result;

use super::model::{format_date, BudgetEntryChangeset, BudgetEntryDB, NewBudgetEntryDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::budget_entries;

pub struct EntryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl EntryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        EntryRepository { pool, writer }
    }
}

fn to_domain(row: BudgetEntryDB) -> Result<BudgetEntry> {
    Ok(BudgetEntry::try_from(row)?)
}

#[async_trait]
impl EntryRepositoryTrait for EntryRepository {
    fn get_entry(&self, entry_id: i32) -> Result<Option<BudgetEntry>> {
        let mut conn = get_connection(&self.pool)?;
        budget_entries::table
            .find(entry_id)
            .select(BudgetEntryDB::as_select())
            .first::<BudgetEntryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .map(to_domain)
            .transpose()
    }

    fn list_entries(&self, owner_id: i32, query: &EntryQuery) -> Result<Vec<BudgetEntry>> {
        let mut conn = get_connection(&self.pool)?;

        let mut sql = budget_entries::table
            .filter(budget_entries::user_id.eq(owner_id))
            .into_boxed();
        if let Some(category) = &query.category {
            sql = sql.filter(budget_entries::category.eq(category.clone()));
        }
        if let Some(entry_type) = query.entry_type {
            sql = sql.filter(budget_entries::entry_type.eq(entry_type.as_str()));
        }
        if let Some(start) = query.start_date {
            sql = sql.filter(budget_entries::date.ge(format_date(start)));
        }
        if let Some(end) = query.end_date {
            sql = sql.filter(budget_entries::date.le(format_date(end)));
        }

        sql.order((budget_entries::date.desc(), budget_entries::id.desc()))
            .select(BudgetEntryDB::as_select())
            .load::<BudgetEntryDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn create_entry(&self, new_entry: NewBudgetEntry) -> Result<BudgetEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetEntry> {
                let row = diesel::insert_into(budget_entries::table)
                    .values(NewBudgetEntryDB::from(new_entry))
                    .returning(BudgetEntryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                to_domain(row)
            })
            .await
    }

    async fn update_entry(&self, entry_update: BudgetEntryUpdate) -> Result<BudgetEntry> {
        let entry_id = entry_update.id;
        let changes = BudgetEntryChangeset::from(entry_update);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<BudgetEntry> {
                let row = diesel::update(budget_entries::table.find(entry_id))
                    .set(&changes)
                    .returning(BudgetEntryDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                to_domain(row)
            })
            .await
    }

    async fn delete_entry(&self, entry_id: i32) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(budget_entries::table.find(entry_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_db;
    use crate::users::UserRepository;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use smartbudget_core::entries::EntryType;
    use smartbudget_core::errors::{DatabaseError, Error};
    use smartbudget_core::users::{NewUser, Role, UserRepositoryTrait};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn seed(repo: &EntryRepository, users: &UserRepository) -> (i32, i32) {
        let mut ids = Vec::new();
        for email in ["alice@x.com", "bob@x.com"] {
            let user = users
                .create_user_with_categories(
                    NewUser {
                        email: email.to_string(),
                        password_hash: "hash".to_string(),
                        role: Role::User,
                    },
                    vec![],
                )
                .await
                .unwrap();
            ids.push(user.id);
        }
        let (alice, bob) = (ids[0], ids[1]);

        let rows = [
            (alice, "2024-01-15", "Food", dec!(50), EntryType::Expense),
            (alice, "2024-01-20", "Salary", dec!(2000), EntryType::Income),
            (alice, "2024-02-03", "Food", dec!(12.5), EntryType::Expense),
            (bob, "2024-01-18", "Rent", dec!(700), EntryType::Expense),
        ];
        for (user_id, date, category, amount, entry_type) in rows {
            repo.create_entry(NewBudgetEntry {
                user_id,
                date: day(date),
                category: category.to_string(),
                amount,
                entry_type,
            })
            .await
            .unwrap();
        }
        (alice, bob)
    }

    #[tokio::test]
    async fn test_list_is_owner_only_and_newest_first() {
        let (pool, writer, _dir) = setup_db();
        let users = UserRepository::new(pool.clone(), writer.clone());
        let repo = EntryRepository::new(pool, writer);
        let (alice, bob) = seed(&repo, &users).await;

        let entries = repo.list_entries(alice, &EntryQuery::default()).unwrap();
        let dates: Vec<String> = entries.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-02-03", "2024-01-20", "2024-01-15"]);
        assert!(entries.iter().all(|e| e.user_id == alice));
        assert_eq!(entries[0].amount, dec!(12.5));

        assert_eq!(repo.list_entries(bob, &EntryQuery::default()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filters_combine() {
        let (pool, writer, _dir) = setup_db();
        let users = UserRepository::new(pool.clone(), writer.clone());
        let repo = EntryRepository::new(pool, writer);
        let (alice, _) = seed(&repo, &users).await;

        let food = repo
            .list_entries(
                alice,
                &EntryQuery {
                    category: Some("Food".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(food.len(), 2);

        let january_expenses = repo
            .list_entries(
                alice,
                &EntryQuery {
                    entry_type: Some(EntryType::Expense),
                    start_date: Some(day("2024-01-01")),
                    end_date: Some(day("2024-01-31")),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(january_expenses.len(), 1);
        assert_eq!(january_expenses[0].category, "Food");

        // Bounds are inclusive
        let single_day = repo
            .list_entries(
                alice,
                &EntryQuery {
                    start_date: Some(day("2024-01-20")),
                    end_date: Some(day("2024-01-20")),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(single_day.len(), 1);
        assert_eq!(single_day[0].entry_type, EntryType::Income);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (pool, writer, _dir) = setup_db();
        let users = UserRepository::new(pool.clone(), writer.clone());
        let repo = EntryRepository::new(pool, writer);
        let (alice, _) = seed(&repo, &users).await;
        let target = repo.list_entries(alice, &EntryQuery::default()).unwrap()[0].clone();

        let updated = repo
            .update_entry(BudgetEntryUpdate {
                id: target.id,
                date: day("2024-02-04"),
                category: "Rent".to_string(),
                amount: dec!(99.99),
                entry_type: EntryType::Expense,
            })
            .await
            .unwrap();
        assert_eq!(updated.user_id, alice);
        assert_eq!(updated.category, "Rent");
        assert_eq!(repo.get_entry(target.id).unwrap().unwrap().amount, dec!(99.99));

        assert_eq!(repo.delete_entry(target.id).await.unwrap(), 1);
        assert!(repo.get_entry(target.id).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_entry_is_not_found() {
        let (pool, writer, _dir) = setup_db();
        let repo = EntryRepository::new(pool, writer);

        let err = repo
            .update_entry(BudgetEntryUpdate {
                id: 404,
                date: day("2024-01-01"),
                category: "Food".to_string(),
                amount: dec!(1),
                entry_type: EntryType::Expense,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::NotFound(_))));
    }
}
